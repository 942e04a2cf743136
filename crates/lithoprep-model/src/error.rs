//! Error types for the model crate.

use thiserror::Error;

/// Errors raised while building or validating model state.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No outward-direction label was supplied for a wall piece.
    #[error("label map has no outward-direction for this piece")]
    MissingOutward,

    /// The outward-direction label is a zero or near-zero vector.
    #[error("outward-direction label is degenerate")]
    DegenerateOutward,

    /// A configuration value is out of range or contradictory.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration override file failed to parse.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The modeling kernel rejected an operation.
    #[error(transparent)]
    Kernel(#[from] lithoprep_kernel::KernelError),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
