//! Straight and circular segments of a bulge polyline.
//!
//! A segment runs from one vertex to the next. Its shape is encoded by the
//! start vertex's bulge: `bulge = tan(sweep / 4)`, positive for a
//! counter-clockwise arc, zero for a straight line.

use std::f64::consts::{PI, TAU};

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use super::{ANGULAR_TOLERANCE, LINEAR_TOLERANCE};
use crate::types::{BBox, Point2};

/// Shared queries over line and arc segments
#[enum_dispatch]
pub trait SegmentGeometry {
    fn start(&self) -> Point2;
    fn end(&self) -> Point2;
    /// Arc length of the segment
    fn length(&self) -> f64;
    /// Point at `distance` along the segment, clamped to its ends
    fn point_at(&self, distance: f64) -> Point2;
    /// Distance along the segment of the closest point to `p`, and the gap
    /// between `p` and that point
    fn closest_distance(&self, p: Point2) -> (f64, f64);
    /// Conservative bounding box
    fn bounds(&self) -> BBox;
}

/// A segment between two consecutive polyline vertices
#[enum_dispatch(SegmentGeometry)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl Segment {
    /// Build the segment running from `start` to `end` with the given bulge.
    pub fn from_vertices(start: Point2, end: Point2, bulge: f64) -> Segment {
        match ArcSegment::from_bulge(start, end, bulge) {
            Some(arc) => Segment::Arc(arc),
            None => Segment::Line(LineSegment::new(start, end)),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line(_))
    }

    /// Bulge to store on the start vertex for this segment
    pub fn bulge(&self) -> f64 {
        match self {
            Segment::Line(_) => 0.0,
            Segment::Arc(arc) => arc.bulge(),
        }
    }
}

// ============================================================================
// Lines
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2,
    pub end: Point2,
}

impl LineSegment {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Unnormalized start→end vector
    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }

    /// Unit direction, or zero for a degenerate segment
    pub fn direction(&self) -> DVec2 {
        self.delta().normalize_or_zero()
    }

    /// Unit normal pointing left of the travel direction
    pub fn left_normal(&self) -> DVec2 {
        self.direction().perp()
    }
}

impl SegmentGeometry for LineSegment {
    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn length(&self) -> f64 {
        self.delta().length()
    }

    fn point_at(&self, distance: f64) -> Point2 {
        let len = self.length();
        if len <= LINEAR_TOLERANCE {
            return self.start;
        }
        self.start + self.delta() * (distance / len).clamp(0.0, 1.0)
    }

    fn closest_distance(&self, p: Point2) -> (f64, f64) {
        let delta = self.delta();
        let len_sq = delta.length_squared();
        if len_sq <= LINEAR_TOLERANCE * LINEAR_TOLERANCE {
            return (0.0, p.distance(self.start));
        }
        let t = ((p - self.start).dot(delta) / len_sq).clamp(0.0, 1.0);
        let foot = self.start + delta * t;
        (t * len_sq.sqrt(), p.distance(foot))
    }

    fn bounds(&self) -> BBox {
        let mut bb = BBox::new();
        bb.expand_point(self.start);
        bb.expand_point(self.end);
        bb
    }
}

// ============================================================================
// Arcs
// ============================================================================

/// Circular arc; `sweep` is signed, positive counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub start: Point2,
    pub end: Point2,
    pub center: Point2,
    pub radius: f64,
    pub sweep: f64,
}

impl ArcSegment {
    /// Arc from `start` to `end` for a bulge value. Returns `None` when the
    /// bulge is (numerically) zero or the chord has no length.
    pub fn from_bulge(start: Point2, end: Point2, bulge: f64) -> Option<Self> {
        if bulge.abs() <= ANGULAR_TOLERANCE {
            return None;
        }
        let chord = end - start;
        let chord_len = chord.length();
        if chord_len <= LINEAR_TOLERANCE {
            return None;
        }
        let mid = (start + end) * 0.5;
        let left = chord.perp() / chord_len;
        // Signed distance from chord midpoint to the center along the left
        // normal; negative bulges put the center on the right.
        let apothem = chord_len * (1.0 - bulge * bulge) / (4.0 * bulge);
        let radius = chord_len * (1.0 + bulge * bulge) / (4.0 * bulge.abs());
        Some(Self {
            start,
            end,
            center: mid + left * apothem,
            radius,
            sweep: 4.0 * bulge.atan(),
        })
    }

    /// Arc about `center` from `start` to `end`, turning in the direction of
    /// `ccw`. Endpoints are assumed to lie on the same circle.
    pub fn from_center(center: Point2, start: Point2, end: Point2, ccw: bool) -> Self {
        let a0 = angle_of(start - center);
        let a1 = angle_of(end - center);
        let mut sweep = a1 - a0;
        if ccw {
            while sweep <= 0.0 {
                sweep += TAU;
            }
        } else {
            while sweep >= 0.0 {
                sweep -= TAU;
            }
        }
        Self {
            start,
            end,
            center,
            radius: start.distance(center),
            sweep,
        }
    }

    pub fn bulge(&self) -> f64 {
        (self.sweep / 4.0).tan()
    }

    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    pub fn start_angle(&self) -> f64 {
        angle_of(self.start - self.center)
    }

    /// Unsigned angle travelled from the start to reach direction `angle`,
    /// in `[0, 2π)`.
    pub fn angle_offset(&self, angle: f64) -> f64 {
        let raw = if self.is_ccw() {
            angle - self.start_angle()
        } else {
            self.start_angle() - angle
        };
        raw.rem_euclid(TAU)
    }

    /// True when the ray from the center at `angle` hits the arc.
    pub fn contains_angle(&self, angle: f64) -> bool {
        let offset = self.angle_offset(angle);
        offset <= self.sweep.abs() + ANGULAR_TOLERANCE || offset >= TAU - ANGULAR_TOLERANCE
    }
}

impl SegmentGeometry for ArcSegment {
    fn start(&self) -> Point2 {
        self.start
    }

    fn end(&self) -> Point2 {
        self.end
    }

    fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    fn point_at(&self, distance: f64) -> Point2 {
        let travelled = (distance / self.radius).clamp(0.0, self.sweep.abs());
        let angle = self.start_angle() + travelled * self.sweep.signum();
        self.center + self.radius * DVec2::from_angle(angle)
    }

    fn closest_distance(&self, p: Point2) -> (f64, f64) {
        let radial = p - self.center;
        if radial.length() > LINEAR_TOLERANCE && self.contains_angle(angle_of(radial)) {
            let offset = self.angle_offset(angle_of(radial));
            // Offsets just below 2π belong to the start of the arc
            let offset = if offset >= TAU - ANGULAR_TOLERANCE {
                0.0
            } else {
                offset.min(self.sweep.abs())
            };
            let distance = offset * self.radius;
            return (distance, p.distance(self.point_at(distance)));
        }
        let to_start = p.distance(self.start);
        let to_end = p.distance(self.end);
        if to_start <= to_end {
            (0.0, to_start)
        } else {
            (self.length(), to_end)
        }
    }

    fn bounds(&self) -> BBox {
        let mut bb = BBox::new();
        bb.expand_point(self.start);
        bb.expand_point(self.end);
        for quadrant in 0..4 {
            let angle = quadrant as f64 * PI / 2.0;
            if self.contains_angle(angle) {
                bb.expand_point(self.center + self.radius * DVec2::from_angle(angle));
            }
        }
        bb
    }
}

/// Polar angle of a vector in `(-π, π]`
#[inline]
pub fn angle_of(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Signed area of the triangle `a, b, c` times two; negative when clockwise.
#[inline]
pub fn orientation(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Quarter-circle test fixture helper used across geometry tests
#[cfg(test)]
pub(crate) fn quarter_arc_ccw() -> ArcSegment {
    // Unit circle about the origin from (1, 0) to (0, 1)
    use glam::dvec2;
    ArcSegment::from_bulge(dvec2(1.0, 0.0), dvec2(0.0, 1.0), (PI / 8.0).tan())
        .expect("non-zero bulge")
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn close_pt(a: Point2, b: Point2) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn zero_bulge_is_a_line() {
        let seg = Segment::from_vertices(dvec2(0.0, 0.0), dvec2(3.0, 4.0), 0.0);
        assert!(seg.is_line());
        assert!(close(seg.length(), 5.0));
        assert!(close_pt(seg.point_at(2.5), dvec2(1.5, 2.0)));
    }

    #[test]
    fn quarter_arc_geometry() {
        let arc = quarter_arc_ccw();
        assert!(close_pt(arc.center, dvec2(0.0, 0.0)));
        assert!(close(arc.radius, 1.0));
        assert!(close(arc.sweep, PI / 2.0));
        assert!(close(arc.length(), PI / 2.0));
        let mid = arc.point_at(PI / 4.0);
        assert!(close_pt(mid, DVec2::from_angle(PI / 4.0)));
    }

    #[test]
    fn semicircle_bulge_one() {
        let arc = ArcSegment::from_bulge(dvec2(1.0, 0.0), dvec2(-1.0, 0.0), 1.0).unwrap();
        assert!(close_pt(arc.center, dvec2(0.0, 0.0)));
        // Counter-clockwise from (1,0) to (-1,0) passes through (0,1)
        assert!(close_pt(arc.point_at(PI / 2.0), dvec2(0.0, 1.0)));
    }

    #[test]
    fn negative_bulge_turns_clockwise() {
        let arc = ArcSegment::from_bulge(dvec2(1.0, 0.0), dvec2(-1.0, 0.0), -1.0).unwrap();
        assert!(!arc.is_ccw());
        assert!(close_pt(arc.point_at(PI / 2.0), dvec2(0.0, -1.0)));
    }

    #[test]
    fn bulge_round_trips_through_sweep() {
        let arc = ArcSegment::from_bulge(dvec2(0.0, 0.0), dvec2(4.0, 0.0), -0.3).unwrap();
        assert!(close(arc.bulge(), -0.3));
        let rebuilt = ArcSegment::from_center(arc.center, arc.start, arc.end, arc.is_ccw());
        assert!(close(rebuilt.sweep, arc.sweep));
    }

    #[test]
    fn closest_distance_on_arc_interior() {
        let arc = quarter_arc_ccw();
        let (d, gap) = arc.closest_distance(DVec2::from_angle(PI / 6.0) * 3.0);
        assert!(close(d, PI / 6.0));
        assert!(close(gap, 2.0));
    }

    #[test]
    fn closest_distance_outside_sweep_clamps_to_endpoint() {
        let arc = quarter_arc_ccw();
        let (d, _) = arc.closest_distance(dvec2(-2.0, 0.5));
        assert!(close(d, arc.length()));
        let (d, _) = arc.closest_distance(dvec2(0.5, -2.0));
        assert!(close(d, 0.0));
    }

    #[test]
    fn arc_bounds_include_extreme_points() {
        let arc = ArcSegment::from_bulge(dvec2(1.0, 0.0), dvec2(-1.0, 0.0), 1.0).unwrap();
        let bb = arc.bounds();
        assert!(close(bb.max.y, 1.0));
        assert!(close(bb.min.y, 0.0));
    }

    #[test]
    fn orientation_sign() {
        let a = dvec2(0.0, 0.0);
        let b = dvec2(1.0, 0.0);
        assert!(orientation(a, b, dvec2(1.0, 1.0)) > 0.0);
        assert!(orientation(a, b, dvec2(1.0, -1.0)) < 0.0);
    }
}
