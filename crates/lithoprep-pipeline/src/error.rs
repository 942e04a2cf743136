//! The pipeline's error taxonomy.

use lithoprep_kernel::KernelError;
use lithoprep_model::ModelError;
use lithoprep_orient::OrientError;
use lithoprep_split::SplitError;
use thiserror::Error;

/// Errors that abort preparation for a piece.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Missing or contradictory label/configuration input. Fatal, not
    /// retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No orientation and no split within the recursion bound fits the
    /// build volume. The caller may retry with a larger printer or a
    /// relaxed tilt range.
    #[error("piece '{piece}' cannot fit printer '{volume}' within the split recursion bound")]
    InfeasibleFit {
        /// Piece that failed.
        piece: String,
        /// Printer that was tested.
        volume: String,
    },

    /// A kernel boolean kept failing after its bounded retries.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl From<ModelError> for PrepError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Kernel(k) => PrepError::Kernel(k),
            other => PrepError::Configuration(other.to_string()),
        }
    }
}

impl From<SplitError> for PrepError {
    fn from(e: SplitError) -> Self {
        match e {
            SplitError::Kernel(k) => PrepError::Kernel(k),
            SplitError::Model(m) => m.into(),
            SplitError::NoCandidates(piece) => PrepError::Configuration(format!(
                "no viable split plane for piece '{piece}'"
            )),
        }
    }
}

impl From<OrientError> for PrepError {
    fn from(e: OrientError) -> Self {
        match e {
            OrientError::Model(m) => m.into(),
            OrientError::Infeasible { volume, .. } => PrepError::InfeasibleFit {
                piece: String::new(),
                volume,
            },
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;
