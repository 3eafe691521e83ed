use bevy::math::Vec3;

use super::helpers::{area_m2, centroid_depth, force_direction};
use super::ForceContext;
use crate::constants::{M_TO_UU, UP, UU_TO_M};
use crate::hull::SubmergedPolygon;

/// Hydrostatic lift: the weight of the water column above each wetted
/// polygon, pushed straight up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Buoyancy {
    density: f32,
}

impl Buoyancy {
    pub fn new(density: f32) -> Self {
        Self { density }
    }

    pub fn compute_force(&self, polygon: &SubmergedPolygon, ctx: &ForceContext) -> Vec3 {
        // faces whose inward side looks down are interior walls
        if force_direction(polygon).dot(UP) < 0.0 {
            return Vec3::ZERO;
        }
        let Some(depth) = centroid_depth(polygon, ctx) else {
            return Vec3::ZERO;
        };

        let gravity = ctx.gravity_z.abs() * UU_TO_M;
        let newtons = self.density * gravity * area_m2(polygon) * depth * UU_TO_M;
        UP * newtons * M_TO_UU
    }
}
