//! Corner rounding between two straight polyline segments.

use std::f64::consts::{FRAC_PI_2, PI};

use super::polyline::{Polyline, Vertex};
use super::segment::{Segment, orientation};
use super::{ANGULAR_TOLERANCE, LINEAR_TOLERANCE};
use crate::errors::GeometryError;
use crate::log::debug;
use crate::types;

/// Round the corner shared by segments `segment1` and `segment2` with a
/// tangent arc of `radius`.
///
/// Returns `Ok(false)` and leaves the path untouched when either segment is an
/// arc, the segments continue straight or fold back on themselves, or the arc
/// does not fit inside both segments. On success the corner vertex becomes two
/// vertices (arc start carrying the bulge, then arc end).
///
/// # Errors
///
/// `InvalidArgument` for a non-positive radius, a closed path, or segment
/// indices that are out of range or not consecutive.
pub fn fillet(
    path: &mut Polyline,
    radius: f64,
    segment1: usize,
    segment2: usize,
) -> Result<bool, GeometryError> {
    let radius = types::positive("radius", radius)?;
    if path.is_closed() {
        return Err(GeometryError::invalid(
            "path",
            "closed paths cannot be filleted",
        ));
    }
    if segment2 != segment1 + 1 || segment2 >= path.segment_count() {
        return Err(GeometryError::invalid(
            "segments",
            format!(
                "segments {segment1} and {segment2} are not adjacent segments of a {}-segment path",
                path.segment_count()
            ),
        ));
    }

    let straight = |index| path.segment(index).is_some_and(|s: Segment| s.is_line());
    if !straight(segment1) || !straight(segment2) {
        return Ok(false);
    }
    let corner_index = segment2;
    let (before, corner, after) = {
        let v = path.vertices();
        (v[segment1].point, v[corner_index].point, v[corner_index + 1].point)
    };

    let to_before = before - corner;
    let to_after = after - corner;
    let (len1, len2) = (to_before.length(), to_after.length());
    if len1 <= LINEAR_TOLERANCE || len2 <= LINEAR_TOLERANCE {
        return Ok(false);
    }

    // Interior angle between the two legs, seen from the corner
    let angle = to_before.perp_dot(to_after).abs().atan2(to_before.dot(to_after));
    if angle <= ANGULAR_TOLERANCE || angle >= PI - ANGULAR_TOLERANCE {
        return Ok(false);
    }
    let half_angle = angle / 2.0;
    let trim = radius / half_angle.tan();
    if trim >= len1 - LINEAR_TOLERANCE || trim >= len2 - LINEAR_TOLERANCE {
        debug!(trim, len1, len2, radius, "fillet does not fit");
        return Ok(false);
    }

    let arc_start = corner + to_before / len1 * trim;
    let arc_end = corner + to_after / len2 * trim;
    let mut bulge = ((FRAC_PI_2 - half_angle) / 2.0).tan();
    if orientation(before, corner, after) < 0.0 {
        bulge = -bulge;
    }

    let vertices = path.vertices_mut();
    vertices[corner_index] = Vertex::with_bulge(arc_start, bulge);
    vertices.insert(corner_index + 1, Vertex::new(arc_end));
    Ok(true)
}
