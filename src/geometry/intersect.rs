//! Intersection of segments and polylines.
//!
//! Curve intersections come back ordered by distance along the first curve,
//! with touching points at shared vertices reported once.

use super::polyline::Polyline;
use super::segment::{ArcSegment, LineSegment, Segment, SegmentGeometry, angle_of};
use super::LINEAR_TOLERANCE;
use crate::errors::GeometryError;
use crate::types::Point2;

/// Points closer than this are the same intersection
const MERGE_TOLERANCE: f64 = 1e-7;

/// An intersection located on the first curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub point: Point2,
    /// Distance along the first curve
    pub distance: f64,
}

/// All intersection points of two segments.
///
/// Overlapping collinear lines and overlapping concentric arcs have no
/// discrete answer and fail with `DegenerateGeometry`.
pub fn segment_intersections(a: &Segment, b: &Segment) -> Result<Vec<Point2>, GeometryError> {
    let points = match (a, b) {
        (Segment::Line(l1), Segment::Line(l2)) => line_line(l1, l2)?,
        (Segment::Line(l), Segment::Arc(arc)) | (Segment::Arc(arc), Segment::Line(l)) => {
            line_arc(l, arc)
        }
        (Segment::Arc(a1), Segment::Arc(a2)) => arc_arc(a1, a2)?,
    };
    if points.iter().any(|p| !p.is_finite()) {
        return Err(GeometryError::ToolingFailure(
            "intersection produced a non-finite point".to_string(),
        ));
    }
    Ok(points)
}

/// Intersections of two polylines, ordered by distance along `a`.
pub fn curve_intersections(a: &Polyline, b: &Polyline) -> Result<Vec<CurveHit>, GeometryError> {
    let mut hits: Vec<CurveHit> = Vec::new();
    if !a.bounds().inflated(MERGE_TOLERANCE).overlaps(&b.bounds()) {
        return Ok(hits);
    }

    // Zero-length pieces (repeated vertices) carry no crossing of their own
    let b_segments: Vec<(Segment, crate::types::BBox)> = b
        .segments()
        .filter(|s| s.length() > LINEAR_TOLERANCE)
        .map(|s| {
            let bb = s.bounds().inflated(MERGE_TOLERANCE);
            (s, bb)
        })
        .collect();

    let mut travelled = 0.0;
    for seg_a in a.segments() {
        if seg_a.length() <= LINEAR_TOLERANCE {
            continue;
        }
        let bb_a = seg_a.bounds();
        for (seg_b, bb_b) in &b_segments {
            if !bb_a.overlaps(bb_b) {
                continue;
            }
            for point in segment_intersections(&seg_a, seg_b)? {
                let (local, _) = seg_a.closest_distance(point);
                hits.push(CurveHit {
                    point,
                    distance: travelled + local,
                });
            }
        }
        travelled += seg_a.length();
    }

    hits.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    hits.dedup_by(|later, earlier| later.point.distance(earlier.point) <= MERGE_TOLERANCE);
    Ok(hits)
}

fn line_line(l1: &LineSegment, l2: &LineSegment) -> Result<Vec<Point2>, GeometryError> {
    let r = l1.delta();
    let s = l2.delta();
    let r_len = r.length();
    let s_len = s.length();
    if r_len <= LINEAR_TOLERANCE || s_len <= LINEAR_TOLERANCE {
        return Err(GeometryError::degenerate("zero-length line segment"));
    }

    let qp = l2.start - l1.start;
    let denom = r.perp_dot(s);
    if denom.abs() <= LINEAR_TOLERANCE * r_len * s_len {
        // Parallel: only collinear overlaps matter
        if qp.perp_dot(r).abs() > LINEAR_TOLERANCE * r_len.max(1.0) * qp.length().max(1.0) {
            return Ok(Vec::new());
        }
        let r_sq = r_len * r_len;
        let t0 = qp.dot(r) / r_sq;
        let t1 = t0 + s.dot(r) / r_sq;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        let eps = LINEAR_TOLERANCE / r_len;
        if hi < lo - eps {
            return Ok(Vec::new());
        }
        if (hi - lo) * r_len <= MERGE_TOLERANCE {
            return Ok(vec![l1.start + r * lo]);
        }
        return Err(GeometryError::degenerate("collinear segments overlap"));
    }

    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    let eps_t = MERGE_TOLERANCE / r_len;
    let eps_u = MERGE_TOLERANCE / s_len;
    if (-eps_t..=1.0 + eps_t).contains(&t) && (-eps_u..=1.0 + eps_u).contains(&u) {
        Ok(vec![l1.start + r * t.clamp(0.0, 1.0)])
    } else {
        Ok(Vec::new())
    }
}

fn line_arc(line: &LineSegment, arc: &ArcSegment) -> Vec<Point2> {
    let d = line.delta();
    let a = d.length_squared();
    if a <= LINEAR_TOLERANCE * LINEAR_TOLERANCE {
        return Vec::new();
    }
    let f = line.start - arc.center;
    let b = 2.0 * f.dot(d);
    let c = f.length_squared() - arc.radius * arc.radius;
    let mut disc = b * b - 4.0 * a * c;
    // Tangent contact shows up as a slightly negative discriminant
    let tangent_slack = 4.0 * a * MERGE_TOLERANCE * arc.radius;
    if disc < -tangent_slack {
        return Vec::new();
    }
    disc = disc.max(0.0);

    let sqrt_disc = disc.sqrt();
    let eps = MERGE_TOLERANCE / a.sqrt();
    let mut points: Vec<Point2> = Vec::with_capacity(2);
    for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
        if !(-eps..=1.0 + eps).contains(&t) {
            continue;
        }
        let p = line.start + d * t.clamp(0.0, 1.0);
        if arc.contains_angle(angle_of(p - arc.center))
            && !points.iter().any(|q| q.distance(p) <= MERGE_TOLERANCE)
        {
            points.push(p);
        }
    }
    points
}

fn arc_arc(a1: &ArcSegment, a2: &ArcSegment) -> Result<Vec<Point2>, GeometryError> {
    let between = a2.center - a1.center;
    let d = between.length();
    let (r1, r2) = (a1.radius, a2.radius);

    if d <= LINEAR_TOLERANCE {
        if (r1 - r2).abs() > LINEAR_TOLERANCE {
            return Ok(Vec::new());
        }
        // Same circle: endpoints of one arc lying inside the other means the
        // arcs share a stretch of curve
        let shared: Vec<Point2> = [a2.start, a2.end]
            .into_iter()
            .filter(|p| a1.contains_angle(angle_of(*p - a1.center)))
            .chain(
                [a1.start, a1.end]
                    .into_iter()
                    .filter(|p| a2.contains_angle(angle_of(*p - a2.center))),
            )
            .collect();
        if shared.is_empty() {
            return Ok(Vec::new());
        }
        let first = shared[0];
        if shared.iter().all(|p| p.distance(first) <= MERGE_TOLERANCE) {
            return Ok(vec![first]);
        }
        return Err(GeometryError::degenerate("arcs on the same circle overlap"));
    }

    if d > r1 + r2 + MERGE_TOLERANCE || d < (r1 - r2).abs() - MERGE_TOLERANCE {
        return Ok(Vec::new());
    }

    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let unit = between / d;
    let base = a1.center + unit * along;
    let offsets = if h <= MERGE_TOLERANCE {
        vec![0.0]
    } else {
        vec![h, -h]
    };

    Ok(offsets
        .into_iter()
        .map(|o| base + unit.perp() * o)
        .filter(|p| {
            a1.contains_angle(angle_of(*p - a1.center))
                && a2.contains_angle(angle_of(*p - a2.center))
        })
        .collect())
}
