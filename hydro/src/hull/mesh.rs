//! Local hull buffers, extracted once from the mesh asset and never mutated.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};

/// Local-space vertex, index and normal buffers of a hull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    normals: Vec<Vec3>,
}

impl HullMesh {
    /// Validate and wrap hull buffers.
    ///
    /// Indices are consecutive triples. Every triple must reference three
    /// different, non-coincident vertices.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>, normals: Vec<Vec3>) -> HydroResult<Self> {
        if indices.is_empty() {
            return Err(HydroError::InvalidMesh("index buffer is empty".into()));
        }
        if indices.len() % 3 != 0 {
            return Err(HydroError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        if !normals.is_empty() && normals.len() != vertices.len() {
            return Err(HydroError::InvalidMesh(format!(
                "{} normals for {} vertices",
                normals.len(),
                vertices.len()
            )));
        }
        if let Some(bad) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(HydroError::InvalidMesh(format!("vertex {bad} is not finite")));
        }

        for (triangle, triple) in indices.chunks_exact(3).enumerate() {
            let [a, b, c] = [triple[0], triple[1], triple[2]];
            if let Some(&out_of_range) = triple.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(HydroError::InvalidMesh(format!(
                    "triangle {triangle} references vertex {out_of_range} of {}",
                    vertices.len()
                )));
            }
            if a == b || a == c || b == c {
                return Err(HydroError::InvalidMesh(format!(
                    "triangle {triangle} repeats an index: ({a}, {b}, {c})"
                )));
            }
            let (va, vb, vc) = (
                vertices[a as usize],
                vertices[b as usize],
                vertices[c as usize],
            );
            if va == vb || va == vc || vb == vc {
                return Err(HydroError::InvalidMesh(format!(
                    "triangle {triangle} has coincident vertices"
                )));
            }
        }

        Ok(Self {
            vertices,
            indices,
            normals,
        })
    }

    /// Closed box hull centred on the origin, each face split into
    /// `subdivisions`² quads.
    ///
    /// Triangles wind so that `cross(v2 - v1, v3 - v1)` points into the hull.
    pub fn box_hull(length: f32, beam: f32, depth: f32, subdivisions: u32) -> HydroResult<Self> {
        if !(length > 0.0 && beam > 0.0 && depth > 0.0) {
            return Err(HydroError::InvalidMesh(format!(
                "box hull dimensions must be positive, got {length} x {beam} x {depth}"
            )));
        }
        let n = subdivisions.max(1);
        let half = Vec3::new(length, beam, depth) * 0.5;
        let (x, y, z) = (Vec3::X * length, Vec3::Y * beam, Vec3::Z * depth);

        // (corner, u, v) with cross(u, v) pointing inwards
        let faces = [
            (Vec3::new(-half.x, -half.y, -half.z), x, y), // bottom
            (Vec3::new(-half.x, -half.y, half.z), y, x),  // deck
            (Vec3::new(-half.x, -half.y, -half.z), y, z), // stern
            (Vec3::new(half.x, -half.y, -half.z), z, y),  // bow
            (Vec3::new(-half.x, -half.y, -half.z), z, x), // starboard
            (Vec3::new(-half.x, half.y, -half.z), x, z),  // port
        ];

        let stride = n + 1;
        let mut vertices = Vec::with_capacity(faces.len() * (stride * stride) as usize);
        let mut normals = Vec::with_capacity(vertices.capacity());
        let mut indices = Vec::with_capacity(faces.len() * (n * n * 6) as usize);

        for (corner, u, v) in faces {
            let base = vertices.len() as u32;
            let outward = -u.cross(v).normalize();
            for j in 0..stride {
                for i in 0..stride {
                    let (s, t) = (i as f32 / n as f32, j as f32 / n as f32);
                    vertices.push(corner + u * s + v * t);
                    normals.push(outward);
                }
            }
            for j in 0..n {
                for i in 0..n {
                    let a = base + j * stride + i;
                    let b = a + 1;
                    let c = a + stride + 1;
                    let d = a + stride;
                    indices.extend_from_slice(&[a, b, c, a, c, d]);
                }
            }
        }

        Self::new(vertices, indices, normals)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local half extents of the vertex bounding box.
    pub fn half_extents(&self) -> Vec3 {
        let (min, max) = self.bounds();
        (max - min) * 0.5
    }

    /// Local (min, max) corners of the vertex bounding box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), v| (min.min(*v), max.max(*v)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Vec3> {
        vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::Y,
        ]
    }

    #[test]
    fn test_valid_mesh() {
        let mesh = HullMesh::new(quad(), vec![0, 1, 2, 0, 2, 3], Vec::new()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_rejects_partial_triple() {
        let err = HullMesh::new(quad(), vec![0, 1, 2, 3], Vec::new()).unwrap_err();
        assert!(matches!(err, HydroError::InvalidMesh(_)));
    }

    #[test]
    fn test_rejects_repeated_index() {
        assert!(HullMesh::new(quad(), vec![0, 1, 1], Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        assert!(HullMesh::new(quad(), vec![0, 1, 9], Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_coincident_vertices() {
        let mut vertices = quad();
        vertices[2] = vertices[1];
        assert!(HullMesh::new(vertices, vec![0, 1, 2], Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_mismatched_normals() {
        assert!(HullMesh::new(quad(), vec![0, 1, 2], vec![Vec3::Z]).is_err());
    }

    #[test]
    fn test_box_hull_counts_and_extents() {
        let mesh = HullMesh::box_hull(400.0, 200.0, 100.0, 3).unwrap();
        assert_eq!(mesh.triangle_count(), 6 * 3 * 3 * 2);
        assert_eq!(mesh.half_extents(), Vec3::new(200.0, 100.0, 50.0));
    }

    #[test]
    fn test_box_hull_winds_inwards() {
        let mesh = HullMesh::box_hull(4.0, 2.0, 1.0, 2).unwrap();
        let v = mesh.vertices();
        for triple in mesh.indices().chunks_exact(3) {
            let (a, b, c) = (v[triple[0] as usize], v[triple[1] as usize], v[triple[2] as usize]);
            let inward = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                inward.dot(-centroid) > 0.0,
                "Face at {centroid:?} should wind towards the hull centre"
            );
        }
    }
}
