//! Shared primitives: points, bounding boxes, host handles and numeric
//! validation.
//!
//! Core geometry is planar and works on `glam::DVec2`. `Point3` only appears
//! where the host hands back 3D picks.

use std::fmt;

use glam::{DVec2, DVec3};

use crate::errors::GeometryError;

/// Planar coordinate
pub type Point2 = DVec2;

/// Host-side coordinate (Z is ignored by the core)
pub type Point3 = DVec3;

/// Drop the Z coordinate of a host point.
#[inline]
pub fn flatten(p: Point3) -> Point2 {
    p.truncate()
}

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Accept any finite value.
pub fn finite(name: &'static str, val: f64) -> Result<f64, GeometryError> {
    check_finite(val).map_err(|cause| GeometryError::InvalidNumeric { name, cause })
}

/// Accept finite values `>= 0`.
pub fn non_negative(name: &'static str, val: f64) -> Result<f64, GeometryError> {
    check_finite(val)
        .and_then(|v| if v < 0.0 { Err(NumericError::Negative) } else { Ok(v) })
        .map_err(|cause| GeometryError::InvalidNumeric { name, cause })
}

/// Accept finite values `> 0`.
pub fn positive(name: &'static str, val: f64) -> Result<f64, GeometryError> {
    check_finite(val)
        .and_then(|v| {
            if v == 0.0 {
                Err(NumericError::Zero)
            } else if v < 0.0 {
                Err(NumericError::Negative)
            } else {
                Ok(v)
            }
        })
        .map_err(|cause| GeometryError::InvalidNumeric { name, cause })
}

/// Opaque handle of a host drawing entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// Horizontal text justification relative to the anchor point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Point2,
    pub max: Point2,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include another box
    pub fn expand_box(&mut self, other: &BBox) {
        if !other.is_empty() {
            self.expand_point(other.min);
            self.expand_point(other.max);
        }
    }

    /// Grow every side by `margin`
    pub fn inflated(&self, margin: f64) -> BBox {
        BBox {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    /// True when the two boxes share at least one point
    pub fn overlaps(&self, other: &BBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(positive("r", 1.0).is_ok());
        assert_eq!(
            positive("r", 0.0),
            Err(GeometryError::InvalidNumeric { name: "r", cause: NumericError::Zero })
        );
        assert_eq!(
            positive("r", -2.0),
            Err(GeometryError::InvalidNumeric { name: "r", cause: NumericError::Negative })
        );
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("d", 0.0), Ok(0.0));
        assert!(non_negative("d", -0.5).is_err());
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert!(matches!(
            finite("x", f64::NAN),
            Err(GeometryError::InvalidNumeric { cause: NumericError::NaN, .. })
        ));
        assert!(matches!(
            finite("x", f64::NEG_INFINITY),
            Err(GeometryError::InvalidNumeric { cause: NumericError::Infinite, .. })
        ));
    }

    #[test]
    fn flatten_drops_z() {
        assert_eq!(flatten(DVec3::new(1.0, 2.0, 9.0)), dvec2(1.0, 2.0));
    }

    #[test]
    fn bbox_new_is_empty() {
        assert!(BBox::new().is_empty());
    }

    #[test]
    fn bbox_expand_and_size() {
        let mut bb = BBox::new();
        bb.expand_point(dvec2(1.0, 2.0));
        bb.expand_point(dvec2(5.0, 8.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.min, dvec2(1.0, 2.0));
        assert_eq!(bb.max, dvec2(5.0, 8.0));
    }

    #[test]
    fn bbox_overlap_touching_counts() {
        let mut a = BBox::new();
        a.expand_point(dvec2(0.0, 0.0));
        a.expand_point(dvec2(1.0, 1.0));
        let mut b = BBox::new();
        b.expand_point(dvec2(1.0, 1.0));
        b.expand_point(dvec2(2.0, 2.0));
        assert!(a.overlaps(&b));

        let mut c = BBox::new();
        c.expand_point(dvec2(3.0, 3.0));
        assert!(!a.overlaps(&c));
        assert!(a.inflated(2.0).overlaps(&c));
    }

    #[test]
    fn empty_bbox_never_overlaps() {
        let mut a = BBox::new();
        a.expand_point(dvec2(0.0, 0.0));
        assert!(!a.overlaps(&BBox::new()));
    }
}
