//! Per-cell prism slope from the small-angle refraction approximation.
//!
//! A ray entering parallel to the optical axis at radius `r` must be bent by
//! `delta = atan(r / f)` to reach the focal point. A thin prism of material
//! index `n` deflects by roughly `(n - 1) * phi`, so the surface slope that
//! produces the required bend is `tan(phi) = tan(delta) / (n - 1)`.

use serde::Serialize;

use crate::error::DegenerateGeometryError;
use crate::grid::PrismCell;
use crate::lens::LensSpec;

/// Radius below which a cell is treated as sitting on the optical axis.
pub const ON_AXIS_EPSILON: f64 = 1e-9;

/// Optical result for one prism cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OpticalSolution {
    /// Required ray deflection (radians).
    pub delta: f64,
    /// Tangent of the prism surface slope.
    pub tan_phi: f64,
    /// Rise of the ramp across the cell width (mm).
    pub step_height: f64,
}

impl OpticalSolution {
    /// The flat, on-axis solution.
    pub const FLAT: Self = Self {
        delta: 0.0,
        tan_phi: 0.0,
        step_height: 0.0,
    };
}

/// Solve the slope for a cell at effective radius `radius`.
pub fn solve_radius(
    radius: f64,
    spec: &LensSpec,
) -> Result<OpticalSolution, DegenerateGeometryError> {
    let excess = spec.refractive_index() - 1.0;
    if excess.is_nan() || excess <= 0.0 {
        return Err(DegenerateGeometryError(format!(
            "refractive_index - 1 = {excess} reached the slope calculator"
        )));
    }
    if radius < ON_AXIS_EPSILON {
        return Ok(OpticalSolution::FLAT);
    }

    let delta = (radius / spec.focal_length()).atan();
    let tan_phi = delta.tan() / excess;
    Ok(OpticalSolution {
        delta,
        tan_phi,
        step_height: spec.prism_width() * tan_phi,
    })
}

/// Solve the slope for `cell`.
pub fn solve(
    cell: &PrismCell,
    spec: &LensSpec,
) -> Result<OpticalSolution, DegenerateGeometryError> {
    solve_radius(cell.radius, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EffectiveRadius, LensParams};
    use approx::assert_relative_eq;

    fn spec_with_index(n: f64) -> LensSpec {
        LensParams::rectangular(10.0, 10.0, 20.0)
            .with_prisms(3)
            .with_refractive_index(n)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_reference_cells() {
        let spec = spec_with_index(1.5);

        let center = solve(&PrismCell::at(&spec, 1, 1), &spec).unwrap();
        assert_eq!(center, OpticalSolution::FLAT);

        let side = PrismCell::at(&spec, 2, 1);
        assert_relative_eq!(side.cx, 10.0 / 3.0, epsilon = 1e-12);
        let sol = solve(&side, &spec).unwrap();
        assert_relative_eq!(sol.delta, 0.165148677, epsilon = 1e-8);
        assert_relative_eq!(sol.tan_phi, 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(sol.step_height, 10.0 / 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_on_axis_is_flat() {
        let spec = spec_with_index(1.5);
        assert_eq!(solve_radius(0.0, &spec).unwrap(), OpticalSolution::FLAT);
        assert_eq!(solve_radius(5e-10, &spec).unwrap(), OpticalSolution::FLAT);
        assert!(solve_radius(1e-6, &spec).unwrap().tan_phi > 0.0);
    }

    #[test]
    fn test_single_prism_is_flat() {
        let spec = LensParams::rectangular(80.0, 30.0, 5.0)
            .with_prisms(1)
            .with_refractive_index(2.4)
            .with_radius_mode(EffectiveRadius::Radial)
            .validate()
            .unwrap();
        let cell = PrismCell::at(&spec, 0, 0);
        assert_eq!(solve(&cell, &spec).unwrap().step_height, 0.0);
    }

    #[test]
    fn test_step_height_monotonic_in_radius() {
        let spec = spec_with_index(1.49);
        let mut prev = solve_radius(0.0, &spec).unwrap();
        for k in 1..=200 {
            let sol = solve_radius(k as f64 * 0.25, &spec).unwrap();
            assert!(sol.step_height >= prev.step_height);
            assert!(sol.delta >= prev.delta);
            prev = sol;
        }
    }

    #[test]
    fn test_higher_index_needs_less_slope() {
        for &r in &[0.1, 1.0, 3.3, 25.0] {
            let mut prev = f64::INFINITY;
            for &n in &[1.3, 1.49, 1.5, 1.6, 2.0, 2.4] {
                let sol = solve_radius(r, &spec_with_index(n)).unwrap();
                assert!(sol.tan_phi < prev, "tan_phi not decreasing at r={r}, n={n}");
                prev = sol.tan_phi;
            }
        }
    }

    #[test]
    fn test_delta_independent_of_index() {
        let a = solve_radius(4.0, &spec_with_index(1.3)).unwrap();
        let b = solve_radius(4.0, &spec_with_index(2.0)).unwrap();
        assert_eq!(a.delta, b.delta);
    }

    #[test]
    fn test_degenerate_index_is_reported() {
        let mut spec = spec_with_index(1.5);
        spec.refractive_index = 1.0;
        let err = solve_radius(2.0, &spec).unwrap_err();
        assert!(err.to_string().contains("internal invariant"));
        // Even on-axis cells must not mask the broken invariant
        assert!(solve_radius(0.0, &spec).is_err());
    }
}
