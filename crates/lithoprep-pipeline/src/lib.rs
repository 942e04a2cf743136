#![warn(missing_docs)]

//! Print-preparation pipeline orchestrator.
//!
//! Sequences classify → orient → split-if-needed → register → support
//! per piece, enforcing the ordering invariants: orientation is frozen
//! before supports exist, registration derives from the executed split
//! plane, and a parent mesh is retired the moment its children exist.
//!
//! Exclusive access during kernel mutation is ownership, not locking:
//! a `Piece` is consumed by every transform/split/boolean step, so no
//! two jobs can ever mutate the same mesh. Independent pieces after a
//! split are finalized in parallel, merged in piece order.

pub mod error;
pub mod report;

pub use error::{PrepError, Result};
pub use report::{PieceFailure, PieceReport, PrepReport, SplitDecision};

use std::sync::Arc;

use rayon::prelude::*;

use lithoprep_classify::{classify, Classification};
use lithoprep_kernel::SolidKernel;
use lithoprep_model::{BuildVolume, LabelMap, Piece, PrepConfig};
use lithoprep_orient::{select_orientation, OrientError, OrientationChoice};
use lithoprep_split::{
    apply_registration, execute_split, plan_registration, plan_split, PinSocketPair,
};
use lithoprep_support::{generate_supports, Raft, Support};

/// Everything produced for one finalized piece.
#[derive(Debug)]
pub struct PieceResult {
    /// The oriented piece (rotation applied, faces re-enumerated).
    pub piece: Piece,
    /// The frozen orientation.
    pub orientation: OrientationChoice,
    /// Generated supports.
    pub supports: Vec<Support>,
    /// The piece's raft.
    pub raft: Raft,
    /// Pin/socket pairs, when the piece resulted from a split.
    pub registration: Vec<PinSocketPair>,
}

/// The pipeline's complete output.
#[derive(Debug)]
pub struct PrepOutput {
    /// Successfully prepared pieces, in piece order.
    pub pieces: Vec<PieceResult>,
    /// The run report.
    pub report: PrepReport,
}

/// A piece that fits, waiting for finalization.
struct Prepped {
    piece: Piece,
    choice: OrientationChoice,
    /// Classification in the semantic frame; bar crossings are only
    /// detectable there and are mapped into the oriented frame later.
    semantic: Classification,
    registration: Vec<PinSocketPair>,
}

/// The print-preparation pipeline.
pub struct PrintPipeline {
    kernel: Arc<dyn SolidKernel>,
    volume: BuildVolume,
    config: PrepConfig,
}

impl PrintPipeline {
    /// Build a pipeline for one printer profile.
    pub fn new(
        kernel: Arc<dyn SolidKernel>,
        volume: BuildVolume,
        config: PrepConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kernel,
            volume,
            config,
        })
    }

    /// Prepare a piece end to end.
    ///
    /// Failures that only affect one piece of a split are recorded in
    /// the report while siblings proceed; the call errors only when
    /// nothing could be prepared at all.
    pub fn run(&self, piece: Piece, labels: &LabelMap) -> Result<PrepOutput> {
        let labels = labels.clone().resolved(piece.faces());
        let mut splits = Vec::new();
        let mut failures = Vec::new();

        let prepped = self.process(
            piece,
            &labels,
            self.config.split_recursion_limit,
            &mut splits,
            &mut failures,
        )?;

        // Independent pieces proceed fully in parallel; collection
        // preserves piece order so the merge is deterministic.
        let finalized: Vec<std::result::Result<(PieceResult, PieceReport), PieceFailure>> =
            prepped
                .into_par_iter()
                .map(|p| self.finalize(p, &labels))
                .collect();

        let mut pieces = Vec::new();
        let mut piece_reports = Vec::new();
        for outcome in finalized {
            match outcome {
                Ok((result, report)) => {
                    pieces.push(result);
                    piece_reports.push(report);
                }
                Err(failure) => failures.push(failure),
            }
        }

        if pieces.is_empty() {
            let detail = failures
                .first()
                .map(|f| format!("{}: {}", f.piece, f.error))
                .unwrap_or_else(|| "no pieces produced".into());
            return Err(PrepError::Configuration(detail));
        }

        Ok(PrepOutput {
            pieces,
            report: PrepReport {
                printer: self.volume.name.clone(),
                pieces: piece_reports,
                splits,
                failures,
            },
        })
    }

    /// Classify and orient a piece; split and recurse when it cannot
    /// fit. Returns the fitting descendants, best split first.
    fn process(
        &self,
        piece: Piece,
        labels: &LabelMap,
        depth: u32,
        splits: &mut Vec<SplitDecision>,
        failures: &mut Vec<PieceFailure>,
    ) -> Result<Vec<Prepped>> {
        let classification = self.classify_piece(&piece, labels)?;

        match select_orientation(&piece, &classification, labels, &self.volume, &self.config) {
            Ok(choice) => Ok(vec![Prepped {
                piece,
                choice,
                semantic: classification,
                registration: Vec::new(),
            }]),
            Err(OrientError::Infeasible { .. }) if depth > 0 => {
                self.split_and_recurse(piece, &classification, labels, depth, splits, failures)
            }
            Err(OrientError::Infeasible { volume, .. }) => Err(PrepError::InfeasibleFit {
                piece: piece.name().to_string(),
                volume,
            }),
            Err(OrientError::Model(e)) => Err(e.into()),
        }
    }

    fn split_and_recurse(
        &self,
        piece: Piece,
        classification: &Classification,
        labels: &LabelMap,
        depth: u32,
        splits: &mut Vec<SplitDecision>,
        failures: &mut Vec<PieceFailure>,
    ) -> Result<Vec<Prepped>> {
        let name = piece.name().to_string();
        let plans = match plan_split(&piece, classification, labels, &self.volume, &self.config) {
            Ok(plans) => plans,
            // No orientation fits and no split plane exists: terminal.
            Err(lithoprep_split::SplitError::NoCandidates(_)) => {
                return Err(PrepError::InfeasibleFit {
                    piece: name,
                    volume: self.volume.name.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let Some(plan) = plans.first() else {
            return Err(PrepError::InfeasibleFit {
                piece: name,
                volume: self.volume.name.clone(),
            });
        };

        let (neg, pos) = execute_split(&self.kernel, piece, plan, &self.config)?;
        let pairs = plan_registration(&neg, &plan.plane, plan.joint, &self.config);
        let (neg, pos) = apply_registration(&self.kernel, neg, pos, &pairs, &self.config)?;

        splits.push(SplitDecision {
            parent: name,
            axis: format!("{:?}", plan.axis),
            position: plan.position,
            reason: format!("{:?}", plan.reason),
            joint: format!("{:?}", plan.joint),
            registration_pairs: pairs.len(),
        });

        let mut out = Vec::new();
        for child in [neg, pos] {
            let child_name = child.name().to_string();
            match self.process(child, labels, depth - 1, splits, failures) {
                Ok(mut prepped) => {
                    // The split's pairs ride with the first piece of
                    // each child branch.
                    if let Some(first) = prepped.first_mut() {
                        if first.registration.is_empty() {
                            first.registration = pairs.clone();
                        }
                    }
                    out.extend(prepped);
                }
                Err(e) => {
                    tracing::warn!(piece = child_name, error = %e, "child piece failed");
                    failures.push(PieceFailure {
                        piece: child_name,
                        error: e.to_string(),
                    });
                }
            }
        }

        if out.is_empty() {
            return Err(PrepError::InfeasibleFit {
                piece: "split children".into(),
                volume: self.volume.name.clone(),
            });
        }
        Ok(out)
    }

    /// Apply the frozen orientation and generate supports + raft.
    fn finalize(
        &self,
        prepped: Prepped,
        labels: &LabelMap,
    ) -> std::result::Result<(PieceResult, PieceReport), PieceFailure> {
        let name = prepped.piece.name().to_string();
        self.finalize_inner(prepped, labels).map_err(|e| PieceFailure {
            piece: name,
            error: e.to_string(),
        })
    }

    fn finalize_inner(
        &self,
        prepped: Prepped,
        labels: &LabelMap,
    ) -> Result<(PieceResult, PieceReport)> {
        let Prepped {
            piece,
            choice,
            semantic,
            registration,
        } = prepped;

        // This piece is owned exclusively here for the duration of the
        // transform; the old handle is retired inside.
        let oriented = piece.transformed(&self.kernel, &choice.transform)?;

        let oriented_labels = labels.transformed(&choice.transform);
        let mut classification = self.classify_piece(&oriented, &oriented_labels)?;
        // Bars are recognizable only against the semantic axes; carry
        // their crossings into the oriented frame by transform.
        classification.crossings = semantic
            .crossings
            .iter()
            .map(|c| lithoprep_classify::CrossPoint {
                point: choice.transform.apply_point(&c.point),
                bars: c.bars,
                normal: choice.transform.apply_vec(&c.normal),
            })
            .collect();
        let outcome = generate_supports(&oriented, &choice, &classification, &self.config);

        let size = oriented.bounds().extents();
        let report = PieceReport {
            name: oriented.name().to_string(),
            yaw_deg: choice.yaw_deg,
            tilt_deg: choice.tilt_deg,
            peel_applied: choice.peel_applied,
            size: [size.x, size.y, size.z],
            support_count: outcome.supports.len(),
            model_resting_supports: outcome.supports.iter().filter(|s| !s.on_raft()).count(),
            registration_pairs: registration.len(),
            unresolvable_faces: classification.unresolvable.clone(),
            malformed_faces: classification.malformed.len(),
            reduced_tip_contacts: outcome.reduced_tip_contacts,
            skipped_contacts: outcome
                .skipped
                .iter()
                .map(|s| format!("({:.1}, {:.1}, {:.1}): {}", s.point.x, s.point.y, s.point.z, s.reason))
                .collect(),
            warnings: outcome.warnings.clone(),
        };

        Ok((
            PieceResult {
                piece: oriented,
                orientation: choice,
                supports: outcome.supports,
                raft: outcome.raft,
                registration,
            },
            report,
        ))
    }

    fn classify_piece(&self, piece: &Piece, labels: &LabelMap) -> Result<Classification> {
        let classification = classify(piece.faces(), labels, &self.config)?;
        tracing::debug!(
            piece = piece.name(),
            classified = classification.classified_count(),
            "piece classified"
        );
        Ok(classification)
    }
}
