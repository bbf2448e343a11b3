//! STL writers (binary and ASCII).
//!
//! One facet record per mesh triangle, vertices in mesh winding order. The
//! facet normal is recomputed from the vertices by the right-hand rule.

use std::io::Write;

use fresnel_kernel::{Mesh, Triangle};

use crate::error::{ExportError, Result};

const HEADER_SIZE: usize = 80;
const HEADER_TEXT: &[u8] = b"Binary STL generated by fresnel";

/// Size in bytes of a binary STL holding `num_triangles` facets.
pub fn binary_size(num_triangles: usize) -> usize {
    HEADER_SIZE + 4 + num_triangles * 50
}

fn facet_normal(tri: &Triangle) -> [f32; 3] {
    match tri.normal() {
        Some(n) => [n.x as f32, n.y as f32, n.z as f32],
        None => [0.0; 3],
    }
}

/// Write `mesh` as binary STL.
pub fn write_stl_binary<W: Write>(mesh: &Mesh, mut writer: W) -> Result<()> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }
    let count = u32::try_from(mesh.num_triangles())
        .map_err(|_| ExportError::TooManyTriangles(mesh.num_triangles()))?;

    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for tri in mesh {
        for c in facet_normal(tri) {
            writer.write_all(&c.to_le_bytes())?;
        }
        for v in &tri.vertices {
            writer.write_all(&(v.x as f32).to_le_bytes())?;
            writer.write_all(&(v.y as f32).to_le_bytes())?;
            writer.write_all(&(v.z as f32).to_le_bytes())?;
        }
        // Attribute byte count
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Binary STL bytes for `mesh`.
pub fn to_stl_bytes(mesh: &Mesh) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(binary_size(mesh.num_triangles()));
    write_stl_binary(mesh, &mut data)?;
    Ok(data)
}

/// Write `mesh` as ASCII STL under the solid name `name`.
pub fn write_stl_ascii<W: Write>(mesh: &Mesh, name: &str, mut writer: W) -> Result<()> {
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    writeln!(writer, "solid {name}")?;
    for tri in mesh {
        let [nx, ny, nz] = facet_normal(tri);
        writeln!(writer, "  facet normal {nx:e} {ny:e} {nz:e}")?;
        writeln!(writer, "    outer loop")?;
        for v in &tri.vertices {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x as f32, v.y as f32, v.z as f32)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fresnel_kernel::{generate, LensParams};

    fn small_lens() -> Mesh {
        let spec = LensParams::rectangular(10.0, 10.0, 20.0)
            .with_prisms(3)
            .with_facets(2)
            .validate()
            .unwrap();
        generate(&spec).unwrap()
    }

    fn read_f32(bytes: &[u8], offset: usize) -> f32 {
        f32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_binary_layout() {
        let mesh = small_lens();
        let bytes = to_stl_bytes(&mesh).unwrap();
        assert_eq!(bytes.len(), binary_size(mesh.num_triangles()));
        assert_eq!(bytes.len(), 84 + 50 * 108);
        assert!(bytes.starts_with(HEADER_TEXT));
        assert!(!bytes.starts_with(b"solid"));
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, mesh.num_triangles());
    }

    #[test]
    fn test_binary_first_record_matches_first_triangle() {
        let mesh = small_lens();
        let bytes = to_stl_bytes(&mesh).unwrap();
        let tri = mesh.triangles()[0];
        let n = tri.normal().unwrap();
        assert!((read_f32(&bytes, 84) - n.x as f32).abs() < 1e-6);
        assert!((read_f32(&bytes, 92) - n.z as f32).abs() < 1e-6);
        for (k, v) in tri.vertices.iter().enumerate() {
            let off = 84 + 12 + k * 12;
            assert_eq!(read_f32(&bytes, off), v.x as f32);
            assert_eq!(read_f32(&bytes, off + 4), v.y as f32);
            assert_eq!(read_f32(&bytes, off + 8), v.z as f32);
        }
        assert_eq!(&bytes[84 + 48..84 + 50], &[0, 0]);
    }

    #[test]
    fn test_ascii_structure() {
        let mesh = small_lens();
        let mut out = Vec::new();
        write_stl_ascii(&mesh, "lens", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("solid lens\n"));
        assert!(text.trim_end().ends_with("endsolid lens"));
        assert_eq!(text.matches("facet normal").count(), mesh.num_triangles());
        assert_eq!(text.matches("vertex").count(), 3 * mesh.num_triangles());
        assert_eq!(text.matches("endloop").count(), mesh.num_triangles());
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let empty = Mesh::new();
        assert!(matches!(to_stl_bytes(&empty), Err(ExportError::EmptyMesh)));
        let mut out = Vec::new();
        assert!(matches!(
            write_stl_ascii(&empty, "x", &mut out),
            Err(ExportError::EmptyMesh)
        ));
        assert!(out.is_empty());
    }
}
