//! Partition of the aperture into an `n × n` grid of prism cells.

use serde::Serialize;

use crate::lens::LensSpec;

/// One rectangular cell of the lens aperture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrismCell {
    /// Column index (along x).
    pub i: u32,
    /// Row index (along y).
    pub j: u32,
    /// Low x bound.
    pub x1: f64,
    /// High x bound.
    pub x2: f64,
    /// Low y bound.
    pub y1: f64,
    /// High y bound.
    pub y2: f64,
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Distance from the optical axis used for the slope lookup.
    pub radius: f64,
}

impl PrismCell {
    /// Cell `(i, j)` of the grid described by `spec`.
    ///
    /// The grid is centered on the optical axis at `(0, 0)`.
    pub fn at(spec: &LensSpec, i: u32, j: u32) -> Self {
        let pw = spec.prism_width();
        let ph = spec.prism_height();
        let x1 = i as f64 * pw - spec.width() / 2.0;
        let x2 = (i + 1) as f64 * pw - spec.width() / 2.0;
        let y1 = j as f64 * ph - spec.height() / 2.0;
        let y2 = (j + 1) as f64 * ph - spec.height() / 2.0;
        let cx = (x1 + x2) / 2.0;
        let cy = (y1 + y2) / 2.0;
        Self {
            i,
            j,
            x1,
            x2,
            y1,
            y2,
            cx,
            cy,
            radius: spec.radius_mode().radius(cx, cy),
        }
    }

    /// Cell extent along x.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Cell extent along y.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// All cells of the grid in canonical order: row-major over `(i, j)` with
/// `i` as the outer index.
pub fn partition(spec: &LensSpec) -> Vec<PrismCell> {
    let n = spec.n_prisms();
    let mut cells = Vec::with_capacity(spec.cell_count());
    for i in 0..n {
        for j in 0..n {
            cells.push(PrismCell::at(spec, i, j));
        }
    }
    cells
}
