//! Error types for mesh export.

use thiserror::Error;

/// Errors that can occur while writing a mesh.
#[derive(Error, Debug)]
pub enum ExportError {
    /// An I/O error occurred while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Binary STL stores the triangle count as a `u32`.
    #[error("{0} triangles exceed the binary STL limit")]
    TooManyTriangles(usize),

    /// The output format could not be determined.
    #[error("unknown output format: {0:?}")]
    UnknownFormat(String),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
