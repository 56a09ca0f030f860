//! Directional-bore path synthesis.
//!
//! The bore follows the grade line at a fixed depth below it, dives down from the
//! surface at each end, and optionally dips under obstructions that reach
//! below the bore. Every corner is rounded best-effort; corners that cannot
//! take the fillet stay sharp and are reported.

use super::defaults::{DETOUR_HALF_WIDTH, DETOUR_RAMP};
use crate::errors::{GeometryError, ProfileWarning};
use crate::geometry::{
    LINEAR_TOLERANCE, OffsetSide, Polyline, Segment, SegmentGeometry, Vertex, fillet,
    offset_to_side,
};
use crate::log::{self, debug};
use crate::types::{self, Point2};
use glam::dvec2;

/// Something in the ground the bore must pass under. `station` is measured
/// along the bore from its start, `depth` below grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstruction {
    pub station: f64,
    pub depth: f64,
    pub clearance: f64,
}

impl Obstruction {
    /// Depth the bore must reach to pass underneath
    pub fn required_depth(&self) -> f64 {
        self.depth + self.clearance
    }
}

/// A bore path plus the corners it could not round
#[derive(Debug, Clone, PartialEq)]
pub struct BorePlan {
    pub path: Polyline,
    pub warnings: Vec<ProfileWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct BorePathBuilder {
    obstructions: Vec<Obstruction>,
}

/// A detour accepted for insertion on straight segment `segment` of the deep
/// path
struct Detour {
    segment: usize,
    station: f64,
    points: [Point2; 4],
}

impl BorePathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstructions(mut self, obstructions: impl IntoIterator<Item = Obstruction>) -> Self {
        self.obstructions.extend(obstructions);
        self
    }

    /// Build the bore path under `grade`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for non-positive or non-finite depth, dive or
    /// radius; `DegenerateGeometry` when the grade line cannot be offset.
    pub fn build(
        &self,
        grade: &Polyline,
        bore_depth: f64,
        dive_distance: f64,
        fillet_radius: f64,
    ) -> Result<BorePlan, GeometryError> {
        let bore_depth = types::positive("bore_depth", bore_depth)?;
        let dive_distance = types::positive("dive_distance", dive_distance)?;
        let fillet_radius = types::positive("fillet_radius", fillet_radius)?;
        for obstruction in &self.obstructions {
            types::finite("station", obstruction.station)?;
            types::non_negative("depth", obstruction.depth)?;
            types::non_negative("clearance", obstruction.clearance)?;
        }

        // Below grade is right of travel going left to right, left otherwise
        let side = if grade.end_point().x >= grade.start_point().x {
            OffsetSide::Right
        } else {
            OffsetSide::Left
        };
        let deep = offset_to_side(grade, bore_depth, side)?;
        let mut warnings = Vec::new();
        let detours = self.plan_detours(&deep, bore_depth, side, &mut warnings);

        let up = dvec2(0.0, dive_distance);
        let mut vertices = Vec::with_capacity(deep.vertex_count() + 2 + 4 * detours.len());
        let mut corners: Vec<(usize, String)> = Vec::new();

        vertices.push(Vertex::new(deep.start_point() + up));
        corners.push((1, "entry".to_string()));
        let last_deep = deep.vertex_count() - 1;
        for (i, vertex) in deep.vertices().iter().enumerate() {
            let bulge = if i == last_deep { 0.0 } else { vertex.bulge };
            vertices.push(Vertex::with_bulge(vertex.point, bulge));
            for detour in detours.iter().filter(|d| d.segment == i) {
                for point in detour.points {
                    corners.push((vertices.len(), format!("detour at {}", detour.station)));
                    vertices.push(Vertex::new(point));
                }
            }
        }
        corners.push((vertices.len() - 1, "exit".to_string()));
        vertices.push(Vertex::new(deep.end_point() + up));

        let mut path = Polyline::new(vertices)?;
        debug!(vertices = path.vertex_count(), "raw bore path");

        // Highest index first so earlier corners keep their positions
        corners.sort_by(|a, b| b.0.cmp(&a.0));
        for (corner, name) in corners {
            if !fillet(&mut path, fillet_radius, corner - 1, corner)? {
                log::record(
                    &mut warnings,
                    ProfileWarning::FilletNotApplied {
                        corner: name,
                        radius: fillet_radius,
                    },
                );
            }
        }

        Ok(BorePlan { path, warnings })
    }

    fn plan_detours(
        &self,
        deep: &Polyline,
        bore_depth: f64,
        side: OffsetSide,
        warnings: &mut Vec<ProfileWarning>,
    ) -> Vec<Detour> {
        let mut obstructions = self.obstructions.clone();
        obstructions.sort_by(|a, b| a.station.total_cmp(&b.station));

        let total = deep.length();
        let reach = DETOUR_HALF_WIDTH + DETOUR_RAMP;
        let mut detours: Vec<Detour> = Vec::new();
        let mut previous_end = f64::NEG_INFINITY;

        for obstruction in obstructions {
            let extra = obstruction.required_depth() - bore_depth;
            if extra <= LINEAR_TOLERANCE {
                debug!(station = obstruction.station, "obstruction clears the bore");
                continue;
            }
            let station = obstruction.station;
            let skip = |warnings: &mut Vec<ProfileWarning>, reason: &str| {
                log::record(
                    warnings,
                    ProfileWarning::DetourSkipped {
                        station,
                        reason: reason.to_string(),
                    },
                );
            };

            let (from, to) = (station - reach, station + reach);
            if from <= LINEAR_TOLERANCE || to >= total - LINEAR_TOLERANCE {
                skip(warnings, "falls outside the bore path");
                continue;
            }
            if from <= previous_end {
                skip(warnings, "overlaps a previous detour");
                continue;
            }
            let (first, _) = deep.locate(from);
            let (last, _) = deep.locate(to);
            let line = match deep.segment(first) {
                Some(Segment::Line(line)) if first == last => line,
                _ => {
                    skip(warnings, "leaves the straight segment it starts on");
                    continue;
                }
            };

            let down = line.left_normal() * side.signed(extra);
            let travelled: f64 = deep.segments().take(first).map(|s| s.length()).sum();
            let at = |distance: f64| line.point_at(distance - travelled);
            detours.push(Detour {
                segment: first,
                station,
                points: [
                    at(from),
                    at(station - DETOUR_HALF_WIDTH) + down,
                    at(station + DETOUR_HALF_WIDTH) + down,
                    at(to),
                ],
            });
            previous_end = to;
        }
        detours
    }
}
