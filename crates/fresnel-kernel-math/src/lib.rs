#![warn(missing_docs)]

//! Math types for the fresnel lens kernel.
//!
//! Thin wrappers around nalgebra providing the few geometric types the
//! lens generator needs: points, vectors, directions, bounding boxes and
//! tolerance constants.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Unit normal of the triangle `(a, b, c)` by the right-hand rule.
///
/// Counter-clockwise vertices (seen from the side the normal points to)
/// give the normal `(b - a) × (c - a)`. Returns `None` for degenerate
/// triangles: the doubled area is compared against the square of
/// [`Tolerance::DEFAULT`]'s linear tolerance.
pub fn face_normal(a: &Point3, b: &Point3, c: &Point3) -> Option<Dir3> {
    let n = (b - a).cross(&(c - a));
    let linear = Tolerance::DEFAULT.linear;
    if n.norm() < linear * linear {
        return None;
    }
    Some(Dir3::new_normalize(n))
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Smallest box containing all `points`, or `None` if there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: &Point3) {
        for i in 0..3 {
            if p[i] < self.min[i] {
                self.min[i] = p[i];
            }
            if p[i] > self.max[i] {
                self.max[i] = p[i];
            }
        }
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6 mm linear).
    pub const DEFAULT: Self = Self { linear: 1e-6 };
}
