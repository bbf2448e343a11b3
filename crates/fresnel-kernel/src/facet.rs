//! Subdivision of a prism cell into facets and their triangulation.
//!
//! Each facet is a strip of its cell along x (the sloped axis). A facet
//! contributes its planar ramp on top and the matching patch of the flat
//! back plane at `z = -thickness`:
//!
//! ```text
//!        t01 -------- t11          z
//!        /    ramp    /            |  y
//!     t00 -------- t10             | /
//!                                  |/
//!         b01 -------- b11         +---- x
//!        /    base    /
//!     b00 -------- b10
//! ```
//!
//! The vertical walls that join ramps of different heights and close the
//! perimeter are built by [`crate::shell`].

use fresnel_kernel_math::Point3;

use crate::grid::PrismCell;
use crate::lens::LensSpec;
use crate::mesh::Triangle;
use crate::optics::OpticalSolution;

/// Ramp and back-plane triangles emitted per facet, two each.
pub const SURFACE_TRIANGLES_PER_FACET: usize = 4;

/// Which x edge of a cell is nearer the optical axis.
///
/// The near edge always sits at `z = 0` and the far edge is raised by the
/// step height, so steps on both halves of the lens climb outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampOrientation {
    /// The low-x edge is nearer the axis (`cx >= 0`).
    NearSideLow,
    /// The high-x edge is nearer the axis (`cx < 0`).
    NearSideHigh,
}

impl RampOrientation {
    /// Orientation for a cell centered at `cx`.
    pub fn for_center(cx: f64) -> Self {
        if cx >= 0.0 {
            RampOrientation::NearSideLow
        } else {
            RampOrientation::NearSideHigh
        }
    }

    /// Ramp heights `(z at x1, z at x2)` for a given step height.
    pub fn edge_heights(self, step_height: f64) -> (f64, f64) {
        match self {
            RampOrientation::NearSideLow => (0.0, step_height),
            RampOrientation::NearSideHigh => (step_height, 0.0),
        }
    }
}

/// One strip of a prism cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// Index within the cell, `0..n_facets`, increasing with x.
    pub index: u32,
    /// Low x bound.
    pub xa: f64,
    /// High x bound.
    pub xb: f64,
    /// Low y bound.
    pub y1: f64,
    /// High y bound.
    pub y2: f64,
    /// Ramp height at `xa`.
    pub za: f64,
    /// Ramp height at `xb`.
    pub zb: f64,
    /// Back plane height.
    pub base: f64,
}

/// Interpolate with exact endpoints at `t = 0` and `t = 1`, so neighbours
/// computing the same boundary get bit-identical coordinates.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Split `cell` into `spec.n_facets()` strips along x.
pub fn subdivide(cell: &PrismCell, solution: &OpticalSolution, spec: &LensSpec) -> Vec<Facet> {
    let orientation = RampOrientation::for_center(cell.cx);
    let (z1, z2) = orientation.edge_heights(solution.step_height);
    let n = spec.n_facets();
    let base = -spec.thickness();

    (0..n)
        .map(|k| {
            let t0 = k as f64 / n as f64;
            let t1 = (k + 1) as f64 / n as f64;
            Facet {
                index: k,
                xa: lerp(cell.x1, cell.x2, t0),
                xb: lerp(cell.x1, cell.x2, t1),
                y1: cell.y1,
                y2: cell.y2,
                za: lerp(z1, z2, t0),
                zb: lerp(z1, z2, t1),
                base,
            }
        })
        .collect()
}

impl Facet {
    /// Ramp and base triangles, outward winding.
    ///
    /// Both quads are split along the `(xa, y1)`–`(xb, y2)` diagonal.
    pub fn surface(&self) -> [Triangle; SURFACE_TRIANGLES_PER_FACET] {
        let Facet {
            xa,
            xb,
            y1,
            y2,
            za,
            zb,
            base,
            ..
        } = *self;

        let t00 = Point3::new(xa, y1, za);
        let t10 = Point3::new(xb, y1, zb);
        let t11 = Point3::new(xb, y2, zb);
        let t01 = Point3::new(xa, y2, za);
        let b00 = Point3::new(xa, y1, base);
        let b10 = Point3::new(xb, y1, base);
        let b11 = Point3::new(xb, y2, base);
        let b01 = Point3::new(xa, y2, base);

        [
            // Ramp
            Triangle::new(t00, t10, t11),
            Triangle::new(t00, t11, t01),
            // Base
            Triangle::new(b00, b11, b10),
            Triangle::new(b00, b01, b11),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PrismCell;
    use crate::optics::solve;
    use crate::LensParams;
    use approx::assert_relative_eq;

    fn spec(facets: u32) -> LensSpec {
        LensParams::rectangular(10.0, 10.0, 20.0)
            .with_prisms(3)
            .with_facets(facets)
            .with_thickness(2.0)
            .validate()
            .unwrap()
    }

    fn facets_of(spec: &LensSpec, i: u32, j: u32) -> Vec<Facet> {
        let cell = PrismCell::at(spec, i, j);
        let sol = solve(&cell, spec).unwrap();
        subdivide(&cell, &sol, spec)
    }

    #[test]
    fn test_orientation_from_sign() {
        assert_eq!(RampOrientation::for_center(3.3), RampOrientation::NearSideLow);
        assert_eq!(RampOrientation::for_center(0.0), RampOrientation::NearSideLow);
        assert_eq!(RampOrientation::for_center(-3.3), RampOrientation::NearSideHigh);
    }

    #[test]
    fn test_orientation_edge_heights() {
        assert_eq!(RampOrientation::NearSideLow.edge_heights(1.5), (0.0, 1.5));
        assert_eq!(RampOrientation::NearSideHigh.edge_heights(1.5), (1.5, 0.0));
    }

    #[test]
    fn test_outer_edge_is_raised_on_both_sides() {
        let s = spec(1);
        let right = facets_of(&s, 2, 1)[0];
        assert_relative_eq!(right.za, 0.0);
        assert_relative_eq!(right.zb, 10.0 / 9.0, epsilon = 1e-12);
        let left = facets_of(&s, 0, 1)[0];
        assert_relative_eq!(left.za, 10.0 / 9.0, epsilon = 1e-12);
        assert_relative_eq!(left.zb, 0.0);
    }

    #[test]
    fn test_subdivide_interpolates_ramp() {
        let s = spec(4);
        let facets = facets_of(&s, 2, 0);
        assert_eq!(facets.len(), 4);
        let cell = PrismCell::at(&s, 2, 0);
        assert_eq!(facets[0].xa, cell.x1);
        assert_eq!(facets[3].xb, cell.x2);
        for pair in facets.windows(2) {
            assert_eq!(pair[0].xb, pair[1].xa);
            assert_eq!(pair[0].zb, pair[1].za);
        }
        let step = 10.0 / 9.0;
        for (k, f) in facets.iter().enumerate() {
            assert_eq!(f.index, k as u32);
            assert_relative_eq!(f.za, step * k as f64 / 4.0, epsilon = 1e-12);
            assert_relative_eq!(f.zb, step * (k + 1) as f64 / 4.0, epsilon = 1e-12);
            assert_eq!(f.base, -2.0);
        }
    }

    #[test]
    fn test_flat_cell_facets() {
        let s = spec(3);
        for f in facets_of(&s, 1, 1) {
            assert_eq!(f.za, 0.0);
            assert_eq!(f.zb, 0.0);
        }
    }

    #[test]
    fn test_ramp_faces_up_and_base_faces_down() {
        let s = spec(3);
        for i in 0..3 {
            for j in 0..3 {
                for f in facets_of(&s, i, j) {
                    let [r0, r1, b0, b1] = f.surface();
                    for t in [r0, r1] {
                        assert!(t.normal().expect("non-degenerate").z > 0.0);
                    }
                    for t in [b0, b1] {
                        assert_relative_eq!(t.normal().expect("non-degenerate").z, -1.0);
                        assert!(t.vertices.iter().all(|v| v.z == -2.0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_surface_covers_facet_footprint() {
        let f = facets_of(&spec(2), 2, 2)[1];
        let footprint = (f.xb - f.xa) * (f.y2 - f.y1);
        let [r0, r1, b0, b1] = f.surface();
        assert_relative_eq!(b0.area() + b1.area(), footprint, epsilon = 1e-12);
        // The ramp is tilted, so it is larger than its shadow
        assert!(r0.area() + r1.area() > footprint);
    }

    #[test]
    fn test_ramp_diagonal_is_fixed() {
        let f = facets_of(&spec(1), 2, 1)[0];
        let tris = f.surface();
        let low = Point3::new(f.xa, f.y1, f.za);
        let high = Point3::new(f.xb, f.y2, f.zb);
        for t in &tris[..2] {
            assert!(t.vertices.contains(&low));
            assert!(t.vertices.contains(&high));
        }
    }
}
