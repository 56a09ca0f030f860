//! Planar curve geometry for profile construction
//!
//! This module is organized into submodules:
//! - `segment`: line and arc segments behind the `SegmentGeometry` trait
//! - `polyline`: bulge polylines, arc-length queries
//! - `intersect`: segment and curve intersection
//! - `offset`: parallel offset curves
//! - `fillet`: corner rounding

pub mod fillet;
pub mod intersect;
pub mod offset;
pub mod polyline;
pub mod segment;

pub use fillet::fillet;
pub use intersect::{curve_intersections, segment_intersections};
pub use offset::{OffsetSide, offset, offset_to_side};
pub use polyline::{Polyline, Vertex};
pub use segment::{ArcSegment, LineSegment, Segment, SegmentGeometry};

/// Distances below this are treated as zero (drawing units)
pub const LINEAR_TOLERANCE: f64 = 1e-9;

/// Angles and bulges below this are treated as zero (radians)
pub const ANGULAR_TOLERANCE: f64 = 1e-9;

/// Maximum gap for a point to count as lying on a curve
pub const ON_CURVE_TOLERANCE: f64 = 1e-6;
