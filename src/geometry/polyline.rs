//! Bulge polylines: the curve type shared by alignments, candidates, grid
//! lines and bore paths.

use super::segment::{Segment, SegmentGeometry};
use super::{LINEAR_TOLERANCE, ON_CURVE_TOLERANCE};
use crate::errors::GeometryError;
use crate::types::{BBox, Point2};

/// One polyline vertex. `bulge` describes the segment leaving this vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub point: Point2,
    pub bulge: f64,
}

impl Vertex {
    #[inline]
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    #[inline]
    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// Ordered vertices with per-segment bulges. Always holds at least two
/// vertices with finite coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    vertices: Vec<Vertex>,
    closed: bool,
}

impl Polyline {
    /// Create an open polyline.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, GeometryError> {
        Self::build(vertices, false)
    }

    /// Create a closed polyline; the last vertex's bulge describes the
    /// closing segment.
    pub fn new_closed(vertices: Vec<Vertex>) -> Result<Self, GeometryError> {
        Self::build(vertices, true)
    }

    /// Open polyline made of straight segments.
    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Result<Self, GeometryError> {
        Self::new(points.into_iter().map(Vertex::new).collect())
    }

    fn build(vertices: Vec<Vertex>, closed: bool) -> Result<Self, GeometryError> {
        if vertices.len() < 2 {
            return Err(GeometryError::invalid(
                "vertices",
                format!("a polyline needs at least 2 vertices, got {}", vertices.len()),
            ));
        }
        if let Some(bad) = vertices
            .iter()
            .position(|v| !v.point.is_finite() || !v.bulge.is_finite())
        {
            return Err(GeometryError::invalid(
                "vertices",
                format!("vertex {bad} has a non-finite coordinate or bulge"),
            ));
        }
        Ok(Self { vertices, closed })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn segment_count(&self) -> usize {
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.vertices.iter().map(|v| v.point)
    }

    pub fn start_point(&self) -> Point2 {
        self.vertices[0].point
    }

    pub fn end_point(&self) -> Point2 {
        if self.closed {
            self.start_point()
        } else {
            self.vertices[self.vertices.len() - 1].point
        }
    }

    /// Segment `index`, or `None` past the last one
    pub fn segment(&self, index: usize) -> Option<Segment> {
        if index >= self.segment_count() {
            return None;
        }
        let from = self.vertices[index];
        let to = self.vertices[(index + 1) % self.vertices.len()];
        Some(Segment::from_vertices(from.point, to.point, from.bulge))
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    pub fn bounds(&self) -> BBox {
        let mut bb = BBox::new();
        for seg in self.segments() {
            bb.expand_box(&seg.bounds());
        }
        bb
    }

    /// Segment index and local distance for a distance along the curve.
    /// Distances past either end clamp to the end.
    pub fn locate(&self, distance: f64) -> (usize, f64) {
        let mut remaining = distance.max(0.0);
        let last = self.segment_count() - 1;
        for (i, seg) in self.segments().enumerate() {
            let len = seg.length();
            if remaining <= len || i == last {
                return (i, remaining.min(len));
            }
            remaining -= len;
        }
        (last, 0.0)
    }

    /// Point at `distance` along the curve.
    pub fn point_at_distance(&self, distance: f64) -> Result<Point2, GeometryError> {
        let distance = crate::types::non_negative("distance", distance)?;
        let total = self.length();
        if distance > total + LINEAR_TOLERANCE {
            return Err(GeometryError::invalid(
                "distance",
                format!("{distance} is past the end of a curve {total} long"),
            ));
        }
        let (index, local) = self.locate(distance);
        let seg = self.segment(index).ok_or_else(|| {
            GeometryError::ToolingFailure(format!("segment {index} vanished while locating"))
        })?;
        Ok(seg.point_at(local))
    }

    /// Distance along the curve of `point`, which must lie on the curve.
    /// The first segment (in path order) that passes through the point wins.
    pub fn distance_at_point(&self, point: Point2) -> Result<f64, GeometryError> {
        if !point.is_finite() {
            return Err(GeometryError::invalid("point", "non-finite coordinate"));
        }
        let tolerance = ON_CURVE_TOLERANCE * self.length().max(1.0);
        let mut travelled = 0.0;
        let mut best: Option<(f64, f64)> = None;
        for seg in self.segments() {
            let (local, gap) = seg.closest_distance(point);
            if gap <= tolerance {
                return Ok(travelled + local);
            }
            if best.is_none_or(|(_, g)| gap < g) {
                best = Some((travelled + local, gap));
            }
            travelled += seg.length();
        }
        let gap = best.map_or(f64::INFINITY, |(_, g)| g);
        Err(GeometryError::invalid(
            "point",
            format!("({}, {}) is {gap} away from the curve", point.x, point.y),
        ))
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut Vec<Vertex> {
        &mut self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use std::f64::consts::PI;

    fn l_path() -> Polyline {
        Polyline::from_points([dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 5.0)]).unwrap()
    }

    #[test]
    fn rejects_single_vertex() {
        let err = Polyline::from_points([dvec2(0.0, 0.0)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn rejects_non_finite_vertex() {
        let err = Polyline::from_points([dvec2(0.0, 0.0), dvec2(f64::NAN, 1.0)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn open_segment_count() {
        let path = l_path();
        assert_eq!(path.vertex_count(), 3);
        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.length(), 15.0);
    }

    #[test]
    fn closed_adds_closing_segment() {
        let square = Polyline::new_closed(
            [dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(1.0, 1.0), dvec2(0.0, 1.0)]
                .into_iter()
                .map(Vertex::new)
                .collect(),
        )
        .unwrap();
        assert_eq!(square.segment_count(), 4);
        assert_eq!(square.length(), 4.0);
        assert_eq!(square.end_point(), dvec2(0.0, 0.0));
    }

    #[test]
    fn distance_and_point_are_inverse() {
        let path = l_path();
        let p = path.point_at_distance(12.0).unwrap();
        assert!(p.distance(dvec2(10.0, 2.0)) < 1e-12);
        assert!((path.distance_at_point(p).unwrap() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn distance_at_shared_vertex_uses_first_segment() {
        let path = l_path();
        assert_eq!(path.distance_at_point(dvec2(10.0, 0.0)).unwrap(), 10.0);
    }

    #[test]
    fn distance_at_point_off_curve_fails() {
        let path = l_path();
        assert!(path.distance_at_point(dvec2(3.0, 3.0)).is_err());
    }

    #[test]
    fn point_past_end_fails() {
        assert!(l_path().point_at_distance(15.5).is_err());
        assert!(l_path().point_at_distance(-1.0).is_err());
    }

    #[test]
    fn arc_length_counts_toward_distance() {
        // Straight 2 units, then a CCW semicircle of radius 1
        let path = Polyline::new(vec![
            Vertex::new(dvec2(0.0, 0.0)),
            Vertex::with_bulge(dvec2(2.0, 0.0), 1.0),
            Vertex::new(dvec2(2.0, 2.0)),
        ])
        .unwrap();
        assert!((path.length() - (2.0 + PI)).abs() < 1e-12);
        let top = path.point_at_distance(2.0 + PI / 2.0).unwrap();
        assert!(top.distance(dvec2(3.0, 1.0)) < 1e-9);
        assert!((path.distance_at_point(top).unwrap() - (2.0 + PI / 2.0)).abs() < 1e-9);
    }
}
