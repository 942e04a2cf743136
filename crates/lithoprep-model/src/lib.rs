#![warn(missing_docs)]

//! Geometry and label model for the lithoprep print-preparation core.
//!
//! Holds the in-memory representation everything else reads and writes:
//! printable pieces and their derived face records, the externally
//! supplied semantic label map, face categories, printer build-volume
//! profiles, and the numeric configuration with its defaults.

pub mod category;
pub mod config;
pub mod error;
pub mod face;
pub mod label;
pub mod piece;
pub mod volume;

pub use category::FaceCategory;
pub use config::PrepConfig;
pub use error::{ModelError, Result};
pub use face::Face;
pub use label::{Label, LabelMap, LabeledRegion};
pub use piece::Piece;
pub use volume::{lookup_printer, BuildVolume};
