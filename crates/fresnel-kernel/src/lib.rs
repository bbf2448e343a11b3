#![warn(missing_docs)]

//! Faceted Fresnel lens geometry engine.
//!
//! Turns a handful of optical parameters into a closed triangle mesh of a
//! Fresnel lens approximated as an `n × n` grid of independently sloped
//! prisms:
//!
//! 1. [`LensParams::validate`] checks the inputs and yields a [`LensSpec`]
//! 2. [`partition`] splits the aperture into [`PrismCell`]s
//! 3. [`solve`] computes each cell's slope and step height
//! 4. [`subdivide`] cuts each cell into [`Facet`]s
//! 5. [`Relief`] adds the risers and perimeter walls between them
//! 6. [`generate`] triangulates everything into one closed, ordered [`Mesh`]
//!
//! # Example
//!
//! ```
//! use fresnel_kernel::{generate, EffectiveRadius, LensParams};
//!
//! let spec = LensParams::rectangular(100.0, 100.0, 200.0)
//!     .with_prisms(10)
//!     .with_facets(3)
//!     .with_radius_mode(EffectiveRadius::Radial)
//!     .validate()
//!     .unwrap();
//! let mesh = generate(&spec).unwrap();
//! assert!(mesh.num_triangles() > spec.surface_triangle_count());
//! assert!(mesh.volume() > 0.0);
//! ```

pub mod assemble;
pub mod error;
pub mod facet;
pub mod grid;
pub mod lens;
pub mod mesh;
pub mod optics;
pub mod params;
pub mod shell;

pub use fresnel_kernel_math;

pub use assemble::{analyze, generate, generate_serial, CellReport};
pub use error::{DegenerateGeometryError, LensError, Result, ValidationError};
pub use facet::{subdivide, Facet, RampOrientation, SURFACE_TRIANGLES_PER_FACET};
pub use grid::{partition, PrismCell};
pub use lens::{EffectiveRadius, LensSpec};
pub use mesh::{IndexedMesh, Mesh, Triangle};
pub use optics::{solve, solve_radius, OpticalSolution, ON_AXIS_EPSILON};
pub use params::{LensParams, MAX_FACETS};
pub use shell::Relief;
