#![warn(missing_docs)]

//! File writers for fresnel lens meshes.
//!
//! Supports binary STL, ASCII STL and Wavefront OBJ. Writers take any
//! [`std::io::Write`]; [`save`] wraps them with a buffered file.

pub mod error;
pub mod obj;
pub mod stl;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use fresnel_kernel::Mesh;
use tracing::debug;

pub use error::{ExportError, Result};
pub use obj::write_obj;
pub use stl::{binary_size, to_stl_bytes, write_stl_ascii, write_stl_binary};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Binary STL.
    StlBinary,
    /// ASCII STL.
    StlAscii,
    /// Wavefront OBJ with welded vertices.
    Obj,
}

impl ExportFormat {
    /// Infer the format from a file extension (`.stl` is binary).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "stl" => Ok(ExportFormat::StlBinary),
            "obj" => Ok(ExportFormat::Obj),
            _ => Err(ExportError::UnknownFormat(path.display().to_string())),
        }
    }

    /// Short name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::StlBinary => "stl",
            ExportFormat::StlAscii => "ascii",
            ExportFormat::Obj => "obj",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stl" | "binary" | "stl-binary" => Ok(ExportFormat::StlBinary),
            "ascii" | "stl-ascii" => Ok(ExportFormat::StlAscii),
            "obj" => Ok(ExportFormat::Obj),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write `mesh` to any writer in the given format.
pub fn write_mesh<W: Write>(
    mesh: &Mesh,
    format: ExportFormat,
    name: &str,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::StlBinary => write_stl_binary(mesh, writer),
        ExportFormat::StlAscii => write_stl_ascii(mesh, name, writer),
        ExportFormat::Obj => write_obj(&mesh.to_indexed(), name, writer),
    }
}

/// Write `mesh` to `path`.
///
/// Fails before touching the filesystem if the mesh is empty.
pub fn save(mesh: &Mesh, path: &Path, format: ExportFormat, name: &str) -> Result<()> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_mesh(mesh, format, name, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), %format, triangles = mesh.num_triangles(), "wrote mesh");
    Ok(())
}
