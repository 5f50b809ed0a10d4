#![warn(missing_docs)]

//! Math types for the voxgrid voxelization core.
//!
//! Thin wrappers around nalgebra providing the 2D types used when
//! converting slice cross-sections into pixel grids, plus tolerance
//! constants and the endpoint-quantization key the loop repair pass
//! relies on.

use nalgebra::Vector2;

/// A point in the slicing plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the slicing plane.
pub type Vec2 = Vector2<f64>;

/// A point in 3D model space (before projection onto a layer).
pub type Point3 = nalgebra::Point3<f64>;

/// Tolerance for classifying near-zero geometric quantities.
pub const EPS_GEOM: f64 = 1e-10;

/// Default tolerance for stitching slice-segment endpoints.
///
/// Endpoints produced by slicing adjacent triangles rarely compare
/// bit-equal; anything closer than this is treated as the same vertex.
pub const EPS_STITCH: f64 = 1e-6;

/// Whether two points lie within `tolerance` of each other.
pub fn are_close(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a - b).norm_squared() <= tolerance * tolerance
}

/// A tolerance-quantized endpoint key for coordinate matching.
///
/// Quantizing to a `1/tolerance` lattice lets floating-point endpoints
/// be compared and hashed while keeping distinct vertices apart. Points
/// that straddle a lattice boundary can still miss each other, so
/// callers needing a guarantee must fall back to a distance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey {
    x: i64,
    y: i64,
}

impl PointKey {
    /// Quantize a point at the given tolerance.
    pub fn from_point(p: &Point2, tolerance: f64) -> Self {
        let scale = if tolerance > 0.0 {
            1.0 / tolerance
        } else {
            1.0e6
        };
        Self {
            x: (p.x * scale).round() as i64,
            y: (p.y * scale).round() as i64,
        }
    }
}
