//! World-space triangles and the rudder reference point.

use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};

use super::mesh::HullMesh;

/// Three world-space vertices. Vertices must be pairwise distinct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v1: Vec3,
    pub v2: Vec3,
    pub v3: Vec3,
}

impl Triangle {
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { v1, v2, v3 }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v1, self.v2, self.v3]
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.v1 + self.v2 + self.v3) / 3.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.v1 == self.v2 || self.v1 == self.v3 || self.v2 == self.v3
    }
}

/// Which local axis the bow points along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForwardAxis {
    #[default]
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
}

impl ForwardAxis {
    /// Local unit vector the bow points along.
    pub fn local_direction(self) -> Vec3 {
        match self {
            ForwardAxis::PositiveX => Vec3::X,
            ForwardAxis::NegativeX => Vec3::NEG_X,
            ForwardAxis::PositiveY => Vec3::Y,
            ForwardAxis::NegativeY => Vec3::NEG_Y,
        }
    }
}

/// Cached local hull buffers plus everything derived from them once.
#[derive(Debug, Clone)]
pub struct HullGeometry {
    mesh: HullMesh,
    forward_axis: ForwardAxis,
    rudder_local: Vec3,
}

impl HullGeometry {
    pub fn new(mesh: HullMesh, forward_axis: ForwardAxis) -> Self {
        let rudder_local = local_rudder_point(mesh.vertices(), forward_axis);
        Self {
            mesh,
            forward_axis,
            rudder_local,
        }
    }

    pub fn mesh(&self) -> &HullMesh {
        &self.mesh
    }

    pub fn forward_axis(&self) -> ForwardAxis {
        self.forward_axis
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Hull triangles under the given world transform.
    pub fn world_triangles(&self, transform: &Transform) -> Vec<Triangle> {
        let mut out = Vec::with_capacity(self.triangle_count());
        self.world_triangles_into(transform, &mut out);
        out
    }

    /// Same as `world_triangles`, reusing `out`'s allocation.
    pub fn world_triangles_into(&self, transform: &Transform, out: &mut Vec<Triangle>) {
        out.clear();
        out.reserve(self.triangle_count());

        let vertices = self.mesh.vertices();
        out.extend(self.mesh.indices().chunks_exact(3).map(|triple| {
            Triangle::new(
                transform.transform_point(vertices[triple[0] as usize]),
                transform.transform_point(vertices[triple[1] as usize]),
                transform.transform_point(vertices[triple[2] as usize]),
            )
        }));
    }

    /// Rudder point in local space.
    pub fn rudder_local(&self) -> Vec3 {
        self.rudder_local
    }

    /// Rudder point under the given world transform.
    pub fn rudder_reference(&self, transform: &Transform) -> Vec3 {
        transform.transform_point(self.rudder_local)
    }

    /// Local forward direction rotated into world space.
    pub fn world_forward(&self, transform: &Transform) -> Vec3 {
        transform.rotation * self.forward_axis.local_direction()
    }
}

/// Stern, keel depth, centreline: the extreme aft coordinate along the
/// forward axis, the lowest Z, and the mean of the lateral axis.
fn local_rudder_point(vertices: &[Vec3], forward_axis: ForwardAxis) -> Vec3 {
    if vertices.is_empty() {
        return Vec3::ZERO;
    }

    let (min, max) = vertices.iter().fold(
        (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
        |(min, max), v| (min.min(*v), max.max(*v)),
    );
    let mean = vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32;

    match forward_axis {
        ForwardAxis::PositiveX => Vec3::new(min.x, mean.y, min.z),
        ForwardAxis::NegativeX => Vec3::new(max.x, mean.y, min.z),
        ForwardAxis::PositiveY => Vec3::new(mean.x, min.y, min.z),
        ForwardAxis::NegativeY => Vec3::new(mean.x, max.y, min.z),
    }
}
