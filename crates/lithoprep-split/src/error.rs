//! Error types for split planning and registration.

use thiserror::Error;

/// Errors from split planning and execution.
#[derive(Error, Debug)]
pub enum SplitError {
    /// No candidate plane survived filtering.
    #[error("no viable split plane for piece '{0}'")]
    NoCandidates(String),

    /// The kernel failed the split or a registration boolean.
    #[error(transparent)]
    Kernel(#[from] lithoprep_kernel::KernelError),

    /// Label input was unusable.
    #[error(transparent)]
    Model(#[from] lithoprep_model::ModelError),
}

/// Result type for split operations.
pub type Result<T> = std::result::Result<T, SplitError>;
