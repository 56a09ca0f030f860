//! Crossing detection between the alignment and candidate utilities, and
//! projection of each crossing into a profile marker.

use std::collections::HashSet;

use super::category::{DepthTable, UtilityCategory};
use super::linetype;
use crate::errors::{GeometryError, ProfileWarning};
use crate::geometry::{LINEAR_TOLERANCE, Polyline, curve_intersections};
use crate::log::{self, debug};
use crate::types::{EntityId, Point2};
use glam::dvec2;

/// The running line the profile is cut along
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub id: EntityId,
    pub curve: Polyline,
}

/// A utility entity that may cross the alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: EntityId,
    pub curve: Polyline,
    pub category: UtilityCategory,
    /// Encoded size/material code, e.g. `8PVC`
    pub encoded_size: String,
}

/// Where a candidate meets the alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub candidate: EntityId,
    pub distance_along: f64,
    pub category: UtilityCategory,
    pub raw_size_token: String,
}

/// A marker to draw in profile space
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileObject {
    pub center: Point2,
    pub category: UtilityCategory,
    /// Nominal diameter in drawing units
    pub nominal_size: f64,
    pub display_text: String,
}

/// Outcome of one detection batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossingReport {
    pub crossings: Vec<Crossing>,
    pub markers: Vec<ProfileObject>,
    pub warnings: Vec<ProfileWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct CrossingDetector {
    depths: DepthTable,
}

impl CrossingDetector {
    pub fn new(depths: DepthTable) -> Self {
        Self { depths }
    }

    /// Find every candidate crossing `alignment` and place a marker for each
    /// sized one. `origin` is station zero on the grade line.
    ///
    /// Per-candidate failures are collected as warnings; the batch always
    /// completes.
    pub fn find_crossings(
        &self,
        alignment: &Alignment,
        candidates: &[Candidate],
        origin: Point2,
    ) -> CrossingReport {
        let mut report = CrossingReport::default();
        let mut seen: HashSet<EntityId> = HashSet::new();
        let alignment_bounds = alignment.curve.bounds().inflated(LINEAR_TOLERANCE);

        for candidate in candidates {
            if candidate.id == alignment.id || !seen.insert(candidate.id) {
                debug!(id = %candidate.id, "candidate already handled");
                continue;
            }
            if !alignment_bounds.overlaps(&candidate.curve.bounds()) {
                continue;
            }

            let distance_along = match first_crossing(&alignment.curve, &candidate.curve) {
                Ok(Some(d)) => d,
                Ok(None) => continue,
                Err(cause) => {
                    log::record(
                        &mut report.warnings,
                        ProfileWarning::CandidateSkipped {
                            id: candidate.id,
                            cause,
                        },
                    );
                    continue;
                }
            };
            debug!(id = %candidate.id, distance_along, category = %candidate.category, "crossing");
            report.crossings.push(Crossing {
                candidate: candidate.id,
                distance_along,
                category: candidate.category.clone(),
                raw_size_token: candidate.encoded_size.clone(),
            });

            if candidate.category == UtilityCategory::BackOfCurb {
                log::record(
                    &mut report.warnings,
                    ProfileWarning::UnsupportedCategory {
                        id: candidate.id,
                        category: candidate.category.to_string(),
                    },
                );
                continue;
            }

            let size = linetype::decode(&candidate.encoded_size);
            if !size.is_sized() {
                debug!(id = %candidate.id, code = %candidate.encoded_size, "unsized, no marker");
                continue;
            }

            let depth = self.depths.depth_of(&candidate.category);
            report.markers.push(ProfileObject {
                center: dvec2(origin.x + distance_along, origin.y - depth),
                category: candidate.category.clone(),
                nominal_size: size.nominal_size,
                display_text: size.label,
            });
        }

        report
    }
}

/// Distance along `alignment` of its first crossing with `other`.
fn first_crossing(alignment: &Polyline, other: &Polyline) -> Result<Option<f64>, GeometryError> {
    let hits = curve_intersections(alignment, other)?;
    let Some(first) = hits.first() else {
        return Ok(None);
    };
    let distance = alignment.distance_at_point(first.point)?;
    if !distance.is_finite() {
        return Err(GeometryError::ToolingFailure(format!(
            "non-finite distance at ({}, {})",
            first.point.x, first.point.y
        )));
    }
    Ok(Some(distance))
}
