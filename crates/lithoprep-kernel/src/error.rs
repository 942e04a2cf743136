//! Error types for kernel operations.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the modeling-kernel boundary.
#[derive(Error, Debug, Clone)]
pub enum KernelError {
    /// A solid handle is unknown to the kernel (already retired, or foreign).
    #[error("unknown solid handle")]
    UnknownSolid,

    /// A boolean operation failed inside the kernel.
    #[error("boolean operation failed: {0}")]
    BooleanFailed(String),

    /// The kernel produced or was given degenerate geometry.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    /// An operation the kernel does not support on this solid.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A polled job exceeded its deadline and was abandoned.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// A polled job was cancelled before completion.
    #[error("operation cancelled")]
    Cancelled,

    /// The worker thread running a job disappeared without a result.
    #[error("kernel worker vanished without reporting a result")]
    WorkerVanished,

    /// A boolean operation kept failing after the configured retries.
    #[error("'{op}' failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Name of the operation that was retried.
        op: String,
        /// Number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        last: Box<KernelError>,
    },
}

/// Result type for kernel operations.
pub type KernelResult<T> = std::result::Result<T, KernelError>;
