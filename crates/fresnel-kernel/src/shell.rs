//! Vertical walls that close the ramps and back plane into one shell.
//!
//! Heights live on the lens-wide grid of facet breakpoints: column lines
//! `g = i * n_facets + k` along x and row lines `0..=n_prisms` along y.
//! Walls stand on that grid wherever the surfaces on either side differ:
//!
//! - x walls on cell boundaries: risers between a raised edge and the next
//!   cell, and the left and right perimeter down to the back plane;
//! - y walls along each facet: between rows whose ramps differ (radial
//!   mode) and the front and back perimeter.
//!
//! Where column and row lines cross, every wall touching the corner splits
//! its vertical side at all heights that meet there. Neighbouring walls
//! then share those edges exactly instead of forming T-junctions.

use fresnel_kernel_math::Point3;

use crate::facet::{lerp, RampOrientation};
use crate::grid::PrismCell;
use crate::lens::LensSpec;
use crate::mesh::Triangle;
use crate::optics::OpticalSolution;

/// Ramp heights over the whole aperture, with the back plane outside it.
#[derive(Debug, Clone)]
pub struct Relief {
    n_prisms: u32,
    n_facets: u32,
    base: f64,
    cells: Vec<PrismCell>,
    /// Ramp heights at `(x1, x2)` per cell, canonical order.
    edges: Vec<(f64, f64)>,
}

impl Relief {
    /// Build from `cells` in canonical order (as [`partition`](crate::partition)
    /// returns them) and their optical solutions.
    pub fn new(spec: &LensSpec, cells: Vec<PrismCell>, solutions: &[OpticalSolution]) -> Self {
        let edges = cells
            .iter()
            .zip(solutions)
            .map(|(cell, sol)| RampOrientation::for_center(cell.cx).edge_heights(sol.step_height))
            .collect();
        Self {
            n_prisms: spec.n_prisms(),
            n_facets: spec.n_facets(),
            base: -spec.thickness(),
            cells,
            edges,
        }
    }

    /// Cells in canonical order.
    pub fn cells(&self) -> &[PrismCell] {
        &self.cells
    }

    fn index(&self, i: u32, j: u32) -> usize {
        i as usize * self.n_prisms as usize + j as usize
    }

    /// Ramp height of cell `(i, j)` at its breakpoint `k` in
    /// `0..=n_facets`; the back plane for cells outside the grid.
    ///
    /// Same interpolation as [`subdivide`](crate::subdivide), so the
    /// values are bit-identical to the facet corners.
    fn height(&self, i: i64, j: i64, k: u32) -> f64 {
        let n = i64::from(self.n_prisms);
        if i < 0 || j < 0 || i >= n || j >= n {
            return self.base;
        }
        let (z1, z2) = self.edges[self.index(i as u32, j as u32)];
        lerp(z1, z2, k as f64 / self.n_facets as f64)
    }

    fn column_count(&self) -> u32 {
        self.n_prisms * self.n_facets
    }

    /// x of column line `g`.
    fn x(&self, g: u32) -> f64 {
        let (i, k) = (g / self.n_facets, g % self.n_facets);
        if i == self.n_prisms {
            return self.cells[self.index(i - 1, 0)].x2;
        }
        let cell = &self.cells[self.index(i, 0)];
        lerp(cell.x1, cell.x2, k as f64 / self.n_facets as f64)
    }

    /// y of row line `line`.
    fn y(&self, line: u32) -> f64 {
        if line == self.n_prisms {
            self.cells[self.index(0, line - 1)].y2
        } else {
            self.cells[self.index(0, line)].y1
        }
    }

    /// Surface height in `row` just left of column line `g`, or just right
    /// of it when `right` is set.
    fn side(&self, g: u32, right: bool, row: i64) -> f64 {
        let f = self.n_facets;
        if right {
            if g == self.column_count() {
                return self.base;
            }
            self.height(i64::from(g / f), row, g % f)
        } else {
            if g == 0 {
                return self.base;
            }
            let h = g - 1;
            self.height(i64::from(h / f), row, h % f + 1)
        }
    }

    /// Distinct heights of the four surfaces meeting at column line `g`
    /// and row line `line`, ascending.
    fn corner(&self, g: u32, line: u32) -> Vec<f64> {
        let above = i64::from(line);
        let below = above - 1;
        let mut zs = vec![
            self.side(g, false, below),
            self.side(g, false, above),
            self.side(g, true, below),
            self.side(g, true, above),
        ];
        zs.sort_by(f64::total_cmp);
        zs.dedup();
        zs
    }

    /// Vertical chain at `(x, y)` on the corner `(g, line)`, from `lo` to `hi`.
    fn chain(&self, g: u32, line: u32, (x, y): (f64, f64), lo: f64, hi: f64) -> Vec<Point3> {
        self.corner(g, line)
            .into_iter()
            .filter(|z| (lo..=hi).contains(z))
            .map(|z| Point3::new(x, y, z))
            .collect()
    }

    /// Wall on column line `g` across `row`.
    fn x_wall(&self, g: u32, row: u32, out: &mut Vec<Triangle>) {
        let r = i64::from(row);
        let left = self.side(g, false, r);
        let right = self.side(g, true, r);
        if left == right {
            return;
        }
        let (lo, hi) = (left.min(right), left.max(right));
        let x = self.x(g);
        let a = self.chain(g, row, (x, self.y(row)), lo, hi);
        let b = self.chain(g, row + 1, (x, self.y(row + 1)), lo, hi);
        // a -> b runs along +y: unflipped normal is +x
        stitch(&a, &b, left < right, out);
    }

    /// Wall on row line `line` along the facet starting at column line `g`.
    fn y_wall(&self, g: u32, line: u32, out: &mut Vec<Triangle>) {
        let (i, k) = (i64::from(g / self.n_facets), g % self.n_facets);
        let above = i64::from(line);
        let below = above - 1;
        let (lo_a, hi_a) = (self.height(i, below, k), self.height(i, above, k));
        let (lo_b, hi_b) = (self.height(i, below, k + 1), self.height(i, above, k + 1));
        if lo_a == hi_a && lo_b == hi_b {
            return;
        }
        let y = self.y(line);
        let a = self.chain(g, line, (self.x(g), y), lo_a.min(hi_a), lo_a.max(hi_a));
        let b = self.chain(g + 1, line, (self.x(g + 1), y), lo_b.min(hi_b), lo_b.max(hi_b));
        // a -> b runs along +x: unflipped normal is -y
        stitch(&a, &b, lo_a > hi_a || lo_b > hi_b, out);
    }

    /// Append the walls owned by facet `k` of cell `(i, j)`.
    ///
    /// A facet owns the y wall under its low-y edge, the x wall on its
    /// low-x edge when it starts a cell, and the far perimeter walls when
    /// it is last along an axis. Emitted as: low x, high x, low y, high y.
    pub fn facet_walls(&self, i: u32, j: u32, k: u32, out: &mut Vec<Triangle>) {
        let g = i * self.n_facets + k;
        if k == 0 {
            self.x_wall(g, j, out);
        }
        if g + 1 == self.column_count() {
            self.x_wall(g + 1, j, out);
        }
        self.y_wall(g, j, out);
        if j + 1 == self.n_prisms {
            self.y_wall(g, j + 1, out);
        }
    }
}

/// Triangulate the planar strip between two vertical chains, each
/// ascending in z, by always climbing the chain whose next point is lower.
///
/// Unflipped triangles have normal along `(b - a) × z`.
fn stitch(a: &[Point3], b: &[Point3], flip: bool, out: &mut Vec<Triangle>) {
    let (mut i, mut j) = (0, 0);
    while i + 1 < a.len() || j + 1 < b.len() {
        let climb_a = j + 1 == b.len() || (i + 1 < a.len() && a[i + 1].z <= b[j + 1].z);
        let (p, q, r) = if climb_a {
            i += 1;
            (a[i - 1], b[j], a[i])
        } else {
            j += 1;
            (a[i], b[j - 1], b[j])
        };
        out.push(if flip {
            Triangle::new(p, r, q)
        } else {
            Triangle::new(p, q, r)
        });
    }
}
