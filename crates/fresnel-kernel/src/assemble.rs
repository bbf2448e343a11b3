//! Mesh assembly: grid traversal, per-cell optics and shell triangulation.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::facet::{subdivide, SURFACE_TRIANGLES_PER_FACET};
use crate::grid::{partition, PrismCell};
use crate::lens::LensSpec;
use crate::mesh::{Mesh, Triangle};
use crate::optics::{solve, OpticalSolution};
use crate::shell::Relief;

/// A cell together with its optical solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellReport {
    /// Grid cell.
    pub cell: PrismCell,
    /// Slope and step height for the cell.
    pub optics: OpticalSolution,
}

/// Optical solution for every cell, in canonical order.
pub fn analyze(spec: &LensSpec) -> Result<Vec<CellReport>> {
    partition(spec)
        .into_iter()
        .map(|cell| {
            let optics = solve(&cell, spec)?;
            Ok(CellReport { cell, optics })
        })
        .collect()
}

/// Triangles for one cell: facets in x order, each facet's ramp and base
/// followed by the walls it owns.
fn cell_triangles(
    relief: &Relief,
    cell: &PrismCell,
    solution: &OpticalSolution,
    spec: &LensSpec,
) -> Vec<Triangle> {
    let mut out = Vec::with_capacity(spec.n_facets() as usize * SURFACE_TRIANGLES_PER_FACET);
    for facet in subdivide(cell, solution, spec) {
        out.extend(facet.surface());
        relief.facet_walls(cell.i, cell.j, facet.index, &mut out);
    }
    out
}

/// Generate the lens mesh, computing cells in parallel.
///
/// Cells are merged back in canonical row-major order, so the output is
/// identical to [`generate_serial`].
pub fn generate(spec: &LensSpec) -> Result<Mesh> {
    let cells = partition(spec);
    debug!(cells = cells.len(), "partitioned aperture");

    let solutions = cells
        .par_iter()
        .map(|cell| solve(cell, spec))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let relief = Relief::new(spec, cells, &solutions);

    let per_cell: Vec<Vec<Triangle>> = relief
        .cells()
        .par_iter()
        .zip(solutions.par_iter())
        .map(|(cell, solution)| cell_triangles(&relief, cell, solution, spec))
        .collect();

    Ok(finish(spec, per_cell))
}

/// Generate the lens mesh on the calling thread.
pub fn generate_serial(spec: &LensSpec) -> Result<Mesh> {
    let cells = partition(spec);
    debug!(cells = cells.len(), "partitioned aperture");

    let solutions = cells
        .iter()
        .map(|cell| solve(cell, spec))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let relief = Relief::new(spec, cells, &solutions);

    let per_cell = relief
        .cells()
        .iter()
        .zip(&solutions)
        .map(|(cell, solution)| cell_triangles(&relief, cell, solution, spec))
        .collect();

    Ok(finish(spec, per_cell))
}

fn finish(spec: &LensSpec, per_cell: Vec<Vec<Triangle>>) -> Mesh {
    let mut mesh = Mesh::with_capacity(spec.surface_triangle_count());
    for tris in per_cell {
        mesh.extend(tris);
    }

    debug!(
        surface = spec.surface_triangle_count(),
        walls = mesh.num_triangles() - spec.surface_triangle_count(),
        "closed lens shell"
    );
    info!(
        prisms = spec.n_prisms(),
        facets = spec.n_facets(),
        mode = %spec.radius_mode(),
        triangles = mesh.num_triangles(),
        "generated fresnel lens mesh"
    );
    mesh
}
