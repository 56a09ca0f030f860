//! Parallel offset curves for open bulge polylines.
//!
//! Each segment is moved sideways on its own (lines stay parallel, arcs stay
//! concentric), then neighbours are re-joined where their extensions meet.
//! Neighbours whose extensions never meet, or meet too far out, are joined
//! with a straight connector instead.
//!
//! # Sign Convention
//!
//! - Positive distance: left offset (relative to walking direction)
//! - Negative distance: right offset

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

use super::polyline::{Polyline, Vertex};
use super::segment::{ArcSegment, Segment, SegmentGeometry};
use super::LINEAR_TOLERANCE;
use crate::errors::GeometryError;
use crate::log::debug;
use crate::types::{self, Point2};

/// Maximum miter distance as a multiple of `|distance|`. Sharper joins get a
/// straight connector.
const MITER_LIMIT: f64 = 4.0;

/// Which side of the walking direction to offset toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSide {
    Left,
    Right,
}

impl OffsetSide {
    /// Signed distance for a magnitude on this side
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            OffsetSide::Left => magnitude,
            OffsetSide::Right => -magnitude,
        }
    }
}

/// Offset by a non-negative `distance` toward `side`.
pub fn offset_to_side(
    curve: &Polyline,
    distance: f64,
    side: OffsetSide,
) -> Result<Polyline, GeometryError> {
    let distance = types::non_negative("distance", distance)?;
    offset(curve, side.signed(distance))
}

/// Offset `curve` by a signed perpendicular `distance`.
///
/// # Errors
///
/// - `InvalidArgument` for a closed curve or a non-finite distance
/// - `DegenerateGeometry` for a zero-length curve, or when the offset
///   shrinks an arc to nothing or turns a segment around
pub fn offset(curve: &Polyline, distance: f64) -> Result<Polyline, GeometryError> {
    let distance = types::finite("distance", distance)?;
    if curve.is_closed() {
        return Err(GeometryError::invalid(
            "curve",
            "closed curves cannot be offset",
        ));
    }
    if curve.length() <= LINEAR_TOLERANCE {
        return Err(GeometryError::degenerate("cannot offset a zero-length curve"));
    }
    if distance.abs() <= LINEAR_TOLERANCE {
        return Ok(curve.clone());
    }

    let originals: Vec<Segment> = curve
        .segments()
        .filter(|s| s.length() > LINEAR_TOLERANCE)
        .collect();

    let mut pieces: Vec<Piece> = originals
        .iter()
        .enumerate()
        .map(|(i, seg)| Piece::offset_from(seg, distance, i))
        .collect::<Result<_, _>>()?;

    let mut joined: Vec<Piece> = Vec::with_capacity(pieces.len() * 2);
    let mut iter = pieces.drain(..);
    let Some(mut current) = iter.next() else {
        return Err(GeometryError::degenerate("curve has no usable segments"));
    };
    for mut next in iter {
        match join_point(&current, &next, distance) {
            Some(at) => {
                current.set_end(at);
                next.set_start(at);
                joined.push(current);
            }
            None => {
                debug!(
                    x = current.end().x,
                    y = current.end().y,
                    "offset join falls back to a connector"
                );
                let connector = Piece::Line {
                    start: current.end(),
                    end: next.start(),
                    source: None,
                };
                joined.push(current);
                joined.push(connector);
            }
        }
        current = next;
    }
    joined.push(current);

    for piece in &joined {
        piece.check_against(&originals)?;
    }

    let mut vertices: Vec<Vertex> = joined
        .iter()
        .map(|p| Vertex::with_bulge(p.start(), p.bulge()))
        .collect();
    if let Some(last) = joined.last() {
        vertices.push(Vertex::new(last.end()));
    }
    Polyline::new(vertices)
}

/// An offset segment under construction. `source` indexes the original
/// segment it was moved from (connectors have none).
#[derive(Debug, Clone, Copy)]
enum Piece {
    Line {
        start: Point2,
        end: Point2,
        source: Option<usize>,
    },
    Arc {
        center: Point2,
        radius: f64,
        start: Point2,
        end: Point2,
        ccw: bool,
        source: usize,
    },
}

impl Piece {
    fn offset_from(seg: &Segment, distance: f64, index: usize) -> Result<Piece, GeometryError> {
        match seg {
            Segment::Line(line) => {
                let shift = line.left_normal() * distance;
                Ok(Piece::Line {
                    start: line.start + shift,
                    end: line.end + shift,
                    source: Some(index),
                })
            }
            Segment::Arc(arc) => {
                // Left of a counter-clockwise arc is toward its center
                let radius = if arc.is_ccw() {
                    arc.radius - distance
                } else {
                    arc.radius + distance
                };
                if radius <= LINEAR_TOLERANCE {
                    return Err(GeometryError::degenerate(format!(
                        "offset of {distance} collapses arc {index} of radius {}",
                        arc.radius
                    )));
                }
                let scale = radius / arc.radius;
                Ok(Piece::Arc {
                    center: arc.center,
                    radius,
                    start: arc.center + (arc.start - arc.center) * scale,
                    end: arc.center + (arc.end - arc.center) * scale,
                    ccw: arc.is_ccw(),
                    source: index,
                })
            }
        }
    }

    fn start(&self) -> Point2 {
        match *self {
            Piece::Line { start, .. } | Piece::Arc { start, .. } => start,
        }
    }

    fn end(&self) -> Point2 {
        match *self {
            Piece::Line { end, .. } | Piece::Arc { end, .. } => end,
        }
    }

    fn set_start(&mut self, p: Point2) {
        match self {
            Piece::Line { start, .. } | Piece::Arc { start, .. } => *start = p,
        }
    }

    fn set_end(&mut self, p: Point2) {
        match self {
            Piece::Line { end, .. } | Piece::Arc { end, .. } => *end = p,
        }
    }

    fn as_arc(&self) -> Option<ArcSegment> {
        match *self {
            Piece::Arc { center, start, end, ccw, .. } => {
                Some(ArcSegment::from_center(center, start, end, ccw))
            }
            Piece::Line { .. } => None,
        }
    }

    fn bulge(&self) -> f64 {
        self.as_arc().map_or(0.0, |arc| arc.bulge())
    }

    /// Reject pieces that the join step turned around or wrapped.
    fn check_against(&self, originals: &[Segment]) -> Result<(), GeometryError> {
        match *self {
            Piece::Line { start, end, source } => {
                let Some(index) = source else {
                    return Ok(());
                };
                let delta = end - start;
                let original = originals[index].end() - originals[index].start();
                if delta.length() <= LINEAR_TOLERANCE || delta.dot(original) <= 0.0 {
                    return Err(GeometryError::degenerate(format!(
                        "offset collapses segment {index}"
                    )));
                }
                Ok(())
            }
            Piece::Arc { source, .. } => {
                let Some(arc) = self.as_arc() else {
                    return Ok(());
                };
                let Segment::Arc(original) = originals[source] else {
                    return Ok(());
                };
                let sweep = arc.sweep.abs();
                if sweep <= LINEAR_TOLERANCE || sweep > original.sweep.abs() + FRAC_PI_2 {
                    return Err(GeometryError::degenerate(format!(
                        "offset collapses arc {source}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Where two consecutive offset pieces should meet, or `None` when a
/// connector is needed.
fn join_point(a: &Piece, b: &Piece, distance: f64) -> Option<Point2> {
    let (p, q) = (a.end(), b.start());
    if p.distance(q) <= LINEAR_TOLERANCE {
        return Some((p + q) * 0.5);
    }
    let gap_mid = (p + q) * 0.5;

    let candidates: Vec<Point2> = match (*a, *b) {
        (Piece::Line { start: s1, end: e1, .. }, Piece::Line { start: s2, end: e2, .. }) => {
            extended_line_line(s1, e1 - s1, s2, e2 - s2).into_iter().collect()
        }
        (Piece::Line { start, end, .. }, Piece::Arc { center, radius, .. })
        | (Piece::Arc { center, radius, .. }, Piece::Line { start, end, .. }) => {
            extended_line_circle(start, end - start, center, radius)
        }
        (
            Piece::Arc { center: c1, radius: r1, .. },
            Piece::Arc { center: c2, radius: r2, .. },
        ) => circle_circle(c1, r1, c2, r2),
    };

    let best = candidates
        .into_iter()
        .min_by(|x, y| x.distance(gap_mid).total_cmp(&y.distance(gap_mid)))?;
    if best.distance(gap_mid) > MITER_LIMIT * distance.abs() {
        return None;
    }
    Some(best)
}

fn extended_line_line(p: Point2, r: DVec2, q: Point2, s: DVec2) -> Option<Point2> {
    let denom = r.perp_dot(s);
    if denom.abs() <= LINEAR_TOLERANCE * r.length() * s.length() {
        return None;
    }
    let t = (q - p).perp_dot(s) / denom;
    Some(p + r * t)
}

fn extended_line_circle(p: Point2, d: DVec2, center: Point2, radius: f64) -> Vec<Point2> {
    let a = d.length_squared();
    if a <= LINEAR_TOLERANCE * LINEAR_TOLERANCE {
        return Vec::new();
    }
    let f = p - center;
    let b = 2.0 * f.dot(d);
    let c = f.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let root = disc.sqrt();
    vec![
        p + d * ((-b - root) / (2.0 * a)),
        p + d * ((-b + root) / (2.0 * a)),
    ]
}

fn circle_circle(c1: Point2, r1: f64, c2: Point2, r2: f64) -> Vec<Point2> {
    let between = c2 - c1;
    let d = between.length();
    if d <= LINEAR_TOLERANCE || d > r1 + r2 || d < (r1 - r2).abs() {
        return Vec::new();
    }
    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let unit = between / d;
    let base = c1 + unit * along;
    vec![base + unit.perp() * h, base - unit.perp() * h]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::PI;

    fn assert_same_path(a: &Polyline, b: &Polyline) {
        assert_eq!(a.vertex_count(), b.vertex_count(), "{a:?} vs {b:?}");
        for (va, vb) in a.vertices().iter().zip(b.vertices()) {
            assert!(va.point.distance(vb.point) < 1e-9, "{va:?} vs {vb:?}");
            assert!((va.bulge - vb.bulge).abs() < 1e-9, "{va:?} vs {vb:?}");
        }
    }

    #[test]
    fn straight_line_moves_left() {
        let line = Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0)]).unwrap();
        let up = offset(&line, 2.0).unwrap();
        assert_same_path(
            &up,
            &Polyline::from_points([dvec2(0.0, 2.0), dvec2(10.0, 2.0)]).unwrap(),
        );
        let down = offset_to_side(&line, 2.0, OffsetSide::Right).unwrap();
        assert_eq!(down.start_point(), dvec2(0.0, -2.0));
    }

    #[test]
    fn corner_is_mitered() {
        let path =
            Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 5.0)]).unwrap();
        let out = offset(&path, 1.0).unwrap();
        assert_same_path(
            &out,
            &Polyline::from_points([dvec2(0.0, 1.0), dvec2(9.0, 1.0), dvec2(9.0, 5.0)]).unwrap(),
        );
    }

    #[test]
    fn round_trip_restores_straight_polyline() {
        let path = Polyline::from_points([
            dvec2(0.0, 0.0),
            dvec2(40.0, 10.0),
            dvec2(80.0, -5.0),
            dvec2(130.0, 20.0),
        ])
        .unwrap();
        for d in [0.5, 3.0, -2.5] {
            let back = offset(&offset(&path, d).unwrap(), -d).unwrap();
            assert_same_path(&back, &path);
        }
    }

    #[test]
    fn arc_offset_keeps_bulge_and_center() {
        // Counter-clockwise semicircle of radius 5 about the origin
        let path = Polyline::new(vec![
            Vertex::with_bulge(dvec2(5.0, 0.0), 1.0),
            Vertex::new(dvec2(-5.0, 0.0)),
        ])
        .unwrap();
        let inner = offset(&path, 2.0).unwrap();
        assert!(inner.start_point().distance(dvec2(3.0, 0.0)) < 1e-9);
        assert!(inner.end_point().distance(dvec2(-3.0, 0.0)) < 1e-9);
        assert!((inner.vertices()[0].bulge - 1.0).abs() < 1e-9);
        assert!((inner.length() - 3.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn tangent_line_arc_join_needs_no_connector() {
        // Straight run into a tangent quarter turn to the left
        let path = Polyline::new(vec![
            Vertex::new(dvec2(0.0, 0.0)),
            Vertex::with_bulge(dvec2(10.0, 0.0), (PI / 8.0).tan()),
            Vertex::new(dvec2(15.0, 5.0)),
        ])
        .unwrap();
        let out = offset(&path, -1.0).unwrap();
        assert_eq!(out.vertex_count(), 3);
        assert!(out.vertices()[1].point.distance(dvec2(10.0, -1.0)) < 1e-9);
        assert!(out.end_point().distance(dvec2(16.0, 5.0)) < 1e-9);
        assert!((out.vertices()[1].bulge - (PI / 8.0).tan()).abs() < 1e-9);
    }

    #[test]
    fn arc_collapses_when_offset_exceeds_radius() {
        let path = Polyline::new(vec![
            Vertex::with_bulge(dvec2(1.0, 0.0), 1.0),
            Vertex::new(dvec2(-1.0, 0.0)),
        ])
        .unwrap();
        assert!(matches!(
            offset(&path, 1.5),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn short_leg_collapses() {
        let path =
            Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 5.0)]).unwrap();
        assert!(matches!(
            offset(&path, 6.0),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn zero_length_curve_is_degenerate() {
        let dot = Polyline::from_points([dvec2(1.0, 1.0), dvec2(1.0, 1.0)]).unwrap();
        assert!(matches!(
            offset(&dot, 1.0),
            Err(GeometryError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn closed_curve_is_rejected() {
        let tri = Polyline::new_closed(vec![
            Vertex::new(dvec2(0.0, 0.0)),
            Vertex::new(dvec2(1.0, 0.0)),
            Vertex::new(dvec2(0.0, 1.0)),
        ])
        .unwrap();
        assert!(offset(&tri, 0.1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn negative_side_distance_is_rejected() {
        let line = Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0)]).unwrap();
        assert!(
            offset_to_side(&line, -1.0, OffsetSide::Left)
                .unwrap_err()
                .is_invalid_argument()
        );
    }

    #[test]
    fn hairpin_gets_a_connector() {
        let path =
            Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(0.0, 0.5)]).unwrap();
        let out = offset(&path, -0.1).unwrap();
        assert_eq!(out.vertex_count(), 4);
    }
}
