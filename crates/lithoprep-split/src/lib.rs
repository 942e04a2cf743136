#![warn(missing_docs)]

//! Split planning and pin/socket registration for lithoprep.
//!
//! When the orientation solver reports a piece infeasible, the planner
//! searches cut planes along the piece's dominant axes and the
//! registration generator derives exactly-aligned pin/socket pairs
//! from the executed split plane.

pub mod error;
pub mod planner;
pub mod registration;

pub use error::{Result, SplitError};
pub use planner::{execute_split, plan_split, JointKind, SplitPlan, SplitReason};
pub use registration::{apply_registration, plan_registration, Pin, PinSocketPair, Socket};
