//! Wavefront OBJ writer.

use std::io::Write;

use fresnel_kernel::IndexedMesh;

use crate::error::{ExportError, Result};

/// Write an indexed mesh as OBJ: one `v` line per welded vertex, then one
/// 1-based `f` line per triangle.
pub fn write_obj<W: Write>(mesh: &IndexedMesh, name: &str, mut writer: W) -> Result<()> {
    if mesh.num_triangles() == 0 {
        return Err(ExportError::EmptyMesh);
    }

    writeln!(writer, "# fresnel lens")?;
    writeln!(writer, "o {name}")?;
    for v in mesh.vertices.chunks_exact(3) {
        writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
    }
    for f in mesh.indices.chunks_exact(3) {
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fresnel_kernel::{generate, LensParams};

    #[test]
    fn test_obj_counts() {
        let spec = LensParams::rectangular(10.0, 10.0, 20.0)
            .with_prisms(2)
            .validate()
            .unwrap();
        let indexed = generate(&spec).unwrap().to_indexed();
        let mut out = Vec::new();
        write_obj(&indexed, "lens", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let v_lines = text.lines().filter(|l| l.starts_with("v ")).count();
        let f_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(v_lines, indexed.num_vertices());
        assert_eq!(f_lines.len(), 32);
        assert!(text.contains("o lens\n"));
        // Closed shell: V - E + F = 2 with every edge shared by two faces
        assert_eq!(v_lines, 2 + f_lines.len() / 2);

        // Indices are 1-based and in range
        for line in f_lines {
            for idx in line.split_whitespace().skip(1) {
                let idx: usize = idx.parse().unwrap();
                assert!(idx >= 1 && idx <= indexed.num_vertices());
            }
        }
    }

    #[test]
    fn test_welded_vertices_are_shared() {
        // One flat slab: 8 distinct corners for 12 triangles.
        let spec = LensParams::rectangular(4.0, 4.0, 10.0)
            .with_prisms(1)
            .validate()
            .unwrap();
        let indexed = generate(&spec).unwrap().to_indexed();
        assert_eq!(indexed.num_vertices(), 8);
        let mut out = Vec::new();
        write_obj(&indexed, "slab", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
    }

    #[test]
    fn test_empty_rejected() {
        let mut out = Vec::new();
        let err = write_obj(&IndexedMesh::new(), "x", &mut out).unwrap_err();
        assert!(matches!(err, ExportError::EmptyMesh));
    }
}
