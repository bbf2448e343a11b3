//! Raw lens parameters and their validation.
//!
//! [`LensParams`] is what callers fill in (by hand, from CLI flags, or
//! deserialized from a config file). [`LensParams::validate`] is the single
//! gate that turns it into a [`LensSpec`]; nothing downstream re-checks
//! user input.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::lens::{EffectiveRadius, LensSpec};

/// Default refractive index (acrylic / PMMA).
pub const DEFAULT_REFRACTIVE_INDEX: f64 = 1.5;

/// Default facets per prism.
pub const DEFAULT_FACETS: u32 = 1;

/// Default back-plane depth in mm.
pub const DEFAULT_THICKNESS: f64 = 2.0;

/// Upper bound on `n_prisms² · n_facets`.
///
/// Each facet costs at least four triangles, so this keeps a mesh under a
/// few gigabytes and its triangle count well inside the binary STL `u32`.
pub const MAX_FACETS: u64 = 1 << 24;

/// Slack subtracted before rounding `extent / pitch` up, so that pitches
/// that divide the aperture exactly (up to float noise) do not gain a cell.
const PITCH_ROUNDING_SLACK: f64 = 1e-9;

/// Unvalidated lens parameters.
///
/// Alternatives are optional: give either `width`/`height` or `diameter`,
/// and either `n_prisms` or `prism_pitch`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LensParams {
    /// Aperture extent along x (mm).
    pub width: Option<f64>,
    /// Aperture extent along y (mm).
    pub height: Option<f64>,
    /// Square aperture side (mm); sets both width and height.
    pub diameter: Option<f64>,
    /// Focal length (mm).
    pub focal_length: Option<f64>,
    /// Refractive index of the material, `> 1`.
    pub refractive_index: Option<f64>,
    /// Prisms per row and column.
    pub n_prisms: Option<u32>,
    /// Prism pitch (mm); the prism count is derived by ceiling division.
    pub prism_pitch: Option<f64>,
    /// Facets per prism.
    pub n_facets: Option<u32>,
    /// Depth of the flat back plane below `z = 0` (mm).
    pub thickness: Option<f64>,
    /// Effective-radius model.
    pub effective_radius_mode: Option<EffectiveRadius>,
}

impl LensParams {
    /// Rectangular aperture with the given focal length.
    pub fn rectangular(width: f64, height: f64, focal_length: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            focal_length: Some(focal_length),
            ..Default::default()
        }
    }

    /// Square aperture of side `diameter`.
    pub fn square(diameter: f64, focal_length: f64) -> Self {
        Self {
            diameter: Some(diameter),
            focal_length: Some(focal_length),
            ..Default::default()
        }
    }

    /// Set the refractive index.
    pub fn with_refractive_index(mut self, n: f64) -> Self {
        self.refractive_index = Some(n);
        self
    }

    /// Set the prism count per axis.
    pub fn with_prisms(mut self, n: u32) -> Self {
        self.n_prisms = Some(n);
        self
    }

    /// Set the prism pitch.
    pub fn with_prism_pitch(mut self, pitch: f64) -> Self {
        self.prism_pitch = Some(pitch);
        self
    }

    /// Set the facets per prism.
    pub fn with_facets(mut self, n: u32) -> Self {
        self.n_facets = Some(n);
        self
    }

    /// Set the back-plane depth.
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    /// Set the effective-radius model.
    pub fn with_radius_mode(mut self, mode: EffectiveRadius) -> Self {
        self.effective_radius_mode = Some(mode);
        self
    }

    /// Overlay `overrides` on top of `self`; fields set in `overrides` win.
    pub fn merged(self, overrides: &LensParams) -> Self {
        Self {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            diameter: overrides.diameter.or(self.diameter),
            focal_length: overrides.focal_length.or(self.focal_length),
            refractive_index: overrides.refractive_index.or(self.refractive_index),
            n_prisms: overrides.n_prisms.or(self.n_prisms),
            prism_pitch: overrides.prism_pitch.or(self.prism_pitch),
            n_facets: overrides.n_facets.or(self.n_facets),
            thickness: overrides.thickness.or(self.thickness),
            effective_radius_mode: overrides
                .effective_radius_mode
                .or(self.effective_radius_mode),
        }
    }

    /// Check every precondition and build the immutable [`LensSpec`].
    pub fn validate(&self) -> Result<LensSpec, ValidationError> {
        let (width, height) = self.aperture()?;
        let focal_length = positive("focal_length", required("focal_length", self.focal_length)?)?;

        let refractive_index = self.refractive_index.unwrap_or(DEFAULT_REFRACTIVE_INDEX);
        finite("refractive_index", refractive_index)?;
        if refractive_index <= 1.0 {
            return Err(ValidationError::new(
                "refractive_index",
                format!("must be greater than 1.0, got {refractive_index}"),
            ));
        }

        let n_prisms = self.prism_count(width.max(height))?;

        let n_facets = self.n_facets.unwrap_or(DEFAULT_FACETS);
        if n_facets == 0 {
            return Err(ValidationError::new("n_facets", "must be at least 1"));
        }

        self.check_facet_budget(n_prisms, n_facets)?;

        let thickness = positive("thickness", self.thickness.unwrap_or(DEFAULT_THICKNESS))?;

        Ok(LensSpec {
            width,
            height,
            focal_length,
            refractive_index,
            n_prisms,
            n_facets,
            thickness,
            radius_mode: self.effective_radius_mode.unwrap_or_default(),
        })
    }

    fn aperture(&self) -> Result<(f64, f64), ValidationError> {
        match (self.diameter, self.width, self.height) {
            (Some(d), None, None) => {
                let d = positive("diameter", d)?;
                Ok((d, d))
            }
            (Some(_), _, _) => Err(ValidationError::new(
                "diameter",
                "cannot be combined with width or height",
            )),
            (None, w, h) => {
                let w = positive("width", required("width", w)?)?;
                let h = positive("height", required("height", h)?)?;
                Ok((w, h))
            }
        }
    }

    /// Reject grids whose facet total passes [`MAX_FACETS`].
    fn check_facet_budget(&self, n_prisms: u32, n_facets: u32) -> Result<(), ValidationError> {
        let cells = u64::from(n_prisms) * u64::from(n_prisms);
        if cells > MAX_FACETS {
            let field = if self.prism_pitch.is_some() {
                "prism_pitch"
            } else {
                "n_prisms"
            };
            return Err(ValidationError::new(
                field,
                format!("{n_prisms}² prisms exceed the limit of {MAX_FACETS} facets"),
            ));
        }
        match cells.checked_mul(u64::from(n_facets)) {
            Some(total) if total <= MAX_FACETS => Ok(()),
            _ => Err(ValidationError::new(
                "n_facets",
                format!("{n_facets} facets per prism exceed the limit of {MAX_FACETS} facets"),
            )),
        }
    }

    fn prism_count(&self, extent: f64) -> Result<u32, ValidationError> {
        match (self.n_prisms, self.prism_pitch) {
            (Some(_), Some(_)) => Err(ValidationError::new(
                "prism_pitch",
                "cannot be combined with n_prisms",
            )),
            (Some(0), None) => Err(ValidationError::new("n_prisms", "must be at least 1")),
            (Some(n), None) => Ok(n),
            (None, Some(pitch)) => {
                let pitch = positive("prism_pitch", pitch)?;
                let count = (extent / pitch - PITCH_ROUNDING_SLACK).ceil().max(1.0);
                if count > u32::MAX as f64 {
                    return Err(ValidationError::new(
                        "prism_pitch",
                        format!("{pitch} yields too many prisms for a {extent} mm aperture"),
                    ));
                }
                Ok(count as u32)
            }
            (None, None) => Err(ValidationError::new(
                "n_prisms",
                "is required (or give prism_pitch)",
            )),
        }
    }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    value.ok_or_else(|| ValidationError::new(field, "is required"))
}

fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::new(field, format!("must be positive, got {value}")))
    }
}
