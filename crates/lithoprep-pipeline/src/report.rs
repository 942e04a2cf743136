//! The machine-readable run report.

use serde::Serialize;

/// One split decision taken during planning.
#[derive(Debug, Clone, Serialize)]
pub struct SplitDecision {
    /// Piece that was split.
    pub parent: String,
    /// Axis the plane is perpendicular to.
    pub axis: String,
    /// Plane coordinate.
    pub position: f64,
    /// Why this position was a candidate.
    pub reason: String,
    /// Joint kind (butt or corner).
    pub joint: String,
    /// Number of pin/socket pairs generated.
    pub registration_pairs: usize,
}

/// Per-piece outcome summary.
#[derive(Debug, Clone, Serialize)]
pub struct PieceReport {
    /// Piece name (`root`, `root/neg`, ...).
    pub name: String,
    /// In-plane reorientation (degrees).
    pub yaw_deg: f64,
    /// Tilt angle (degrees).
    pub tilt_deg: f64,
    /// Whether the secondary peel tilts were applied.
    pub peel_applied: bool,
    /// Oriented size (X, Y, Z).
    pub size: [f64; 3],
    /// Number of supports generated.
    pub support_count: usize,
    /// Supports resting on the model instead of the raft.
    pub model_resting_supports: usize,
    /// Pin/socket pairs attached to this piece's split.
    pub registration_pairs: usize,
    /// Fragile faces below the minimum resolvable size.
    pub unresolvable_faces: Vec<usize>,
    /// Faces excluded as malformed.
    pub malformed_faces: usize,
    /// Contacts that got the reduced display-proximity tip.
    pub reduced_tip_contacts: usize,
    /// Contacts skipped during base resolution, with reasons.
    pub skipped_contacts: Vec<String>,
    /// Soft-rule findings.
    pub warnings: Vec<String>,
}

/// A piece that failed preparation while its siblings continued.
#[derive(Debug, Clone, Serialize)]
pub struct PieceFailure {
    /// Piece name.
    pub piece: String,
    /// The error it failed with.
    pub error: String,
}

/// The complete run report.
#[derive(Debug, Clone, Serialize)]
pub struct PrepReport {
    /// Printer the run targeted.
    pub printer: String,
    /// Per-piece outcomes, in piece order.
    pub pieces: Vec<PieceReport>,
    /// Split decisions, in the order they were taken.
    pub splits: Vec<SplitDecision>,
    /// Pieces that failed while siblings proceeded.
    pub failures: Vec<PieceFailure>,
}

impl PrepReport {
    /// Serialize the report to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
