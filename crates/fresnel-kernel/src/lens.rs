//! Validated lens configuration.

use serde::{Deserialize, Serialize};

use crate::facet::SURFACE_TRIANGLES_PER_FACET;

/// Distance metric used to look up a cell's required deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveRadius {
    /// One-axis distance `|cx|`: a linear (cylindrical) lens whose slope
    /// varies only along x and is identical for every row.
    #[default]
    Linear,
    /// Two-axis distance `sqrt(cx² + cy²)`: a rotationally-faithful
    /// approximation on the square grid.
    Radial,
}

impl EffectiveRadius {
    /// Effective radius of a cell centered at `(cx, cy)`.
    pub fn radius(self, cx: f64, cy: f64) -> f64 {
        match self {
            EffectiveRadius::Linear => cx.abs(),
            EffectiveRadius::Radial => cx.hypot(cy),
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveRadius::Linear => "linear",
            EffectiveRadius::Radial => "radial",
        }
    }
}

impl std::fmt::Display for EffectiveRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable, validated lens configuration.
///
/// The only way to obtain one is [`LensParams::validate`](crate::LensParams::validate),
/// so every `LensSpec` satisfies: all lengths finite and `> 0`,
/// `refractive_index > 1`, `n_prisms >= 1`, `n_facets >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensSpec {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) focal_length: f64,
    pub(crate) refractive_index: f64,
    pub(crate) n_prisms: u32,
    pub(crate) n_facets: u32,
    pub(crate) thickness: f64,
    pub(crate) radius_mode: EffectiveRadius,
}

impl LensSpec {
    /// Aperture extent along x (mm).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Aperture extent along y (mm).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Focal length (mm).
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    /// Refractive index of the lens material.
    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    /// Prisms along each axis.
    pub fn n_prisms(&self) -> u32 {
        self.n_prisms
    }

    /// Facets per prism.
    pub fn n_facets(&self) -> u32 {
        self.n_facets
    }

    /// Depth of the flat back plane below the reference height `z = 0` (mm).
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Effective-radius model.
    pub fn radius_mode(&self) -> EffectiveRadius {
        self.radius_mode
    }

    /// Width of one prism cell (mm).
    pub fn prism_width(&self) -> f64 {
        self.width / self.n_prisms as f64
    }

    /// Height of one prism cell (mm).
    pub fn prism_height(&self) -> f64 {
        self.height / self.n_prisms as f64
    }

    /// Number of prism cells (`n_prisms²`).
    pub fn cell_count(&self) -> usize {
        let n = self.n_prisms as usize;
        n * n
    }

    /// Number of facets across the whole lens (`n_prisms² · n_facets`).
    ///
    /// Bounded by [`MAX_FACETS`](crate::params::MAX_FACETS), so this never
    /// overflows.
    pub fn facet_count(&self) -> usize {
        self.cell_count() * self.n_facets as usize
    }

    /// Exact number of ramp and back-plane triangles in the mesh.
    ///
    /// Wall triangles come on top of these; how many depends on where
    /// neighbouring heights differ.
    pub fn surface_triangle_count(&self) -> usize {
        self.facet_count() * SURFACE_TRIANGLES_PER_FACET
    }
}
