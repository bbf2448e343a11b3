//! Triangle and mesh types produced by the generator.

use std::collections::HashMap;

use fresnel_kernel_math::{face_normal, BoundingBox, Dir3, Point3, Vec3};

/// Three vertices, counter-clockwise when viewed from outside the solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertex positions in winding order.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Create a triangle from three vertices in winding order.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Outward unit normal by the right-hand rule, `None` if degenerate.
    pub fn normal(&self) -> Option<Dir3> {
        let [a, b, c] = &self.vertices;
        face_normal(a, b, c)
    }

    /// Centroid of the three vertices.
    pub fn centroid(&self) -> Point3 {
        let [a, b, c] = &self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Area.
    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a)).norm() / 2.0
    }

    /// Signed volume of the tetrahedron spanned with the origin, times six.
    fn signed_volume6(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        a.coords.dot(&b.coords.cross(&c.coords))
    }
}

/// Ordered triangle soup with duplicated vertices.
///
/// This is the engine's only output. Order is part of the contract: the
/// same [`LensSpec`](crate::LensSpec) always yields the same sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for `n` triangles.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(n),
        }
    }

    /// Triangles in emission order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Iterate over the triangles in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Positive when every triangle winds outward; a negative value means
    /// the winding is inverted.
    pub fn volume(&self) -> f64 {
        self.triangles.iter().map(Triangle::signed_volume6).sum::<f64>() / 6.0
    }

    /// Centroid of the enclosed solid, `None` if the mesh encloses no volume.
    pub fn centroid(&self) -> Option<Point3> {
        let (six_volume, moment) = self.triangles.iter().fold(
            (0.0, Vec3::zeros()),
            |(v, m), t| {
                let w = t.signed_volume6();
                let [a, b, c] = &t.vertices;
                (v + w, m + (a.coords + b.coords + c.coords) * w)
            },
        );
        if six_volume == 0.0 {
            return None;
        }
        Some(Point3::from(moment / (4.0 * six_volume)))
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.triangles.iter().flat_map(|t| t.vertices.iter()))
    }

    /// Weld coincident vertices into shared index buffers.
    ///
    /// Vertices are numbered in first-seen order, so the result is as
    /// deterministic as the mesh itself. Triangle order and winding are kept.
    pub fn to_indexed(&self) -> IndexedMesh {
        let mut out = IndexedMesh::new();
        let mut seen: HashMap<[u64; 3], u32> = HashMap::new();

        for tri in &self.triangles {
            for v in &tri.vertices {
                let key = [bits(v.x), bits(v.y), bits(v.z)];
                let idx = *seen.entry(key).or_insert_with(|| {
                    let idx = out.num_vertices() as u32;
                    out.vertices.push(v.x as f32);
                    out.vertices.push(v.y as f32);
                    out.vertices.push(v.z as f32);
                    idx
                });
                out.indices.push(idx);
            }
        }

        out
    }
}

/// Bit pattern of `x` with `-0.0` folded onto `0.0`.
fn bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triangle> for Mesh {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

/// Indexed triangle mesh for renderers and index-based file formats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit cube, 12 outward-wound triangles.
    fn unit_cube() -> Mesh {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let v = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ];
        let faces = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        faces
            .iter()
            .map(|f| Triangle::new(v[f[0]], v[f[1]], v[f[2]]))
            .collect()
    }

    #[test]
    fn test_triangle_normal_and_area() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        );
        assert_relative_eq!(t.normal().unwrap().z, 1.0);
        assert_relative_eq!(t.area(), 2.0);
        assert_relative_eq!(t.centroid().x, 2.0 / 3.0);
    }

    #[test]
    fn test_cube_volume_and_area() {
        let cube = unit_cube();
        assert_eq!(cube.num_triangles(), 12);
        assert_relative_eq!(cube.volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cube.surface_area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inverted_winding_gives_negative_volume() {
        let flipped: Mesh = unit_cube()
            .iter()
            .map(|t| Triangle::new(t.vertices[0], t.vertices[2], t.vertices[1]))
            .collect();
        assert_relative_eq!(flipped.volume(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid() {
        let c = unit_cube().centroid().unwrap();
        assert_relative_eq!(c.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.z, 0.5, epsilon = 1e-12);
        assert!(Mesh::new().centroid().is_none());
    }

    #[test]
    fn test_bounding_box() {
        let bbox = unit_cube().bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::origin());
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 1.0));
        assert!(Mesh::new().bounding_box().is_none());
    }

    #[test]
    fn test_to_indexed_welds_vertices() {
        let indexed = unit_cube().to_indexed();
        assert_eq!(indexed.num_vertices(), 8);
        assert_eq!(indexed.num_triangles(), 12);
        // First triangle keeps its order: (0,0,0), (1,1,0), (1,0,0)
        assert_eq!(&indexed.indices[..3], &[0, 1, 2]);
        assert_eq!(&indexed.vertices[3..6], &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_to_indexed_folds_negative_zero() {
        let mesh: Mesh = [
            Triangle::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                Point3::new(-0.0, 0.0, -0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(mesh.to_indexed().num_vertices(), 4);
    }
}
