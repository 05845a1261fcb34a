//! Quad-grid plane geometry held by mesh shapes.

use glam::{DMat4, DVec3};

/// A planar grid of quads.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMesh {
    vertices: Vec<DVec3>,
    faces: Vec<[u32; 4]>,
}

/// Largest subdivision count per axis.
pub const MAX_SUBDIVISIONS: u32 = 1024;

impl PlaneMesh {
    /// Builds a `width x height` grid centered on the origin in the XY plane,
    /// facing +Z, with `subdivisions_x * subdivisions_y` quads.
    ///
    /// Subdivisions are clamped to `1..=MAX_SUBDIVISIONS`.
    pub fn grid(width: f64, height: f64, subdivisions_x: u32, subdivisions_y: u32) -> Self {
        let sx = subdivisions_x.clamp(1, MAX_SUBDIVISIONS);
        let sy = subdivisions_y.clamp(1, MAX_SUBDIVISIONS);
        let row = sx + 1;
        let (nx, ny) = (sx as usize, sy as usize);

        let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=sy {
            let v = f64::from(j) / f64::from(sy) - 0.5;
            for i in 0..=sx {
                let u = f64::from(i) / f64::from(sx) - 0.5;
                vertices.push(DVec3::new(u * width, v * height, 0.0));
            }
        }

        // Counter-clockwise seen from +Z
        let mut faces = Vec::with_capacity(nx * ny);
        for j in 0..sy {
            for i in 0..sx {
                let a = j * row + i;
                faces.push([a, a + 1, a + row + 1, a + row]);
            }
        }

        Self { vertices, faces }
    }

    /// Vertex positions in shape space.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Quads as vertex indices.
    pub fn faces(&self) -> &[[u32; 4]] {
        &self.faces
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Unit normal of a face, from its first three corners.
    pub fn face_normal(&self, face: usize) -> Option<DVec3> {
        let [a, b, c, _] = *self.faces.get(face)?;
        let p = |i: u32| self.vertices[i as usize];
        Some((p(b) - p(a)).cross(p(c) - p(a)).normalize())
    }

    /// Axis-aligned bounds, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }

    /// Moves every vertex through `matrix`.
    pub fn apply_matrix(&mut self, matrix: &DMat4) {
        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let mesh = PlaneMesh::grid(1.0, 1.0, 3, 3);
        assert_eq!(mesh.num_vertices(), 16);
        assert_eq!(mesh.num_faces(), 9);
    }

    #[test]
    fn test_grid_clamps_subdivisions() {
        let mesh = PlaneMesh::grid(1.0, 1.0, u32::MAX, 0);
        assert_eq!(mesh.num_faces(), MAX_SUBDIVISIONS as usize);
        assert_eq!(mesh.num_vertices(), (MAX_SUBDIVISIONS as usize + 1) * 2);
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((hi.x - lo.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_bounds() {
        let mesh = PlaneMesh::grid(2.0, 1.0, 3, 3);
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo - DVec3::new(-1.0, -0.5, 0.0)).length() < 1e-12);
        assert!((hi - DVec3::new(1.0, 0.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_grid_faces_point_along_z() {
        let mesh = PlaneMesh::grid(1.0, 1.0, 3, 3);
        for face in 0..mesh.num_faces() {
            let n = mesh.face_normal(face).unwrap();
            assert!((n - DVec3::Z).length() < 1e-12);
        }
        assert!(mesh.face_normal(9).is_none());
    }

    #[test]
    fn test_zero_subdivisions_is_single_quad() {
        let mesh = PlaneMesh::grid(1.0, 1.0, 0, 0);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 3, 2]]);
    }

    #[test]
    fn test_apply_matrix() {
        let mut mesh = PlaneMesh::grid(1.0, 1.0, 1, 1);
        mesh.apply_matrix(&DMat4::from_translation(DVec3::new(0.0, 0.0, -4.0)));
        assert!(mesh.vertices().iter().all(|v| (v.z + 4.0).abs() < 1e-12));
    }
}
