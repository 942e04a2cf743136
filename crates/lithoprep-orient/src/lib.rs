#![warn(missing_docs)]

//! Orientation solving and build-volume fit checking for lithoprep.
//!
//! Generates discrete tilt/yaw candidates for a piece, tests each
//! against the printer's build volume with a conservative allowance
//! for the not-yet-generated supports and raft, and scores the
//! survivors by support burden.

pub mod fit;
pub mod solver;

pub use fit::{check_fit, FitReport};
pub use solver::{select_orientation, OrientError, OrientationChoice, OrientationScore};
