//! Skin friction drag.
//!
//! The friction coefficient follows the ITTC-57 flat plate line,
//! `Cf = 0.075 / (log10(Re) - 2)²`, scaled by a hull form factor. The
//! Reynolds number is fixed once during initialisation instead of being
//! recomputed per triangle.

use bevy::math::Vec3;

use super::helpers::{area_m2, centroid_depth, force_direction, relative_velocity};
use super::ForceContext;
use crate::config::ViscousDragConfig;
use crate::constants::{
    M_TO_UU, SEAWATER_DYNAMIC_VISCOSITY, SKIN_FRICTION_COEFFICIENT, SMALL_NUMBER, UP, UU_TO_M,
};
use crate::hull::SubmergedPolygon;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscousDrag {
    density: f32,
    k_factor: f32,
    reynolds: f32,
    force_constant: f32,
}

impl ViscousDrag {
    /// Uncalibrated drag. Produces no force until `calibrate` runs.
    pub fn new(config: &ViscousDragConfig, density: f32) -> Self {
        Self {
            density,
            k_factor: config.k_factor,
            reynolds: 0.0,
            force_constant: 0.0,
        }
    }

    /// Fix the Reynolds number from a relative speed (m/s) and the hull's
    /// half extents (host units).
    pub fn calibrate(&mut self, relative_speed: f32, half_extents: Vec3) {
        let length = 2.0 * half_extents.y * UU_TO_M;
        self.reynolds = reynolds_number(self.density, length, relative_speed);
        self.force_constant = skin_friction_constant(self.reynolds, self.density);
    }

    pub fn set_k_factor(&mut self, k_factor: f32) {
        self.k_factor = k_factor;
    }

    pub fn k_factor(&self) -> f32 {
        self.k_factor
    }

    pub fn reynolds_number(&self) -> f32 {
        self.reynolds
    }

    pub fn force_constant(&self) -> f32 {
        self.force_constant
    }

    /// Area-weighted `(1 + k)` over `polygons`, with `forward_k` for
    /// polygons ahead of `hull_center` along `forward` and `back_k` for the
    /// rest. Returns 1 when the polygons have no area.
    pub fn integrated_k_factor(
        polygons: &[SubmergedPolygon],
        hull_center: Vec3,
        forward: Vec3,
        forward_k: f32,
        back_k: f32,
    ) -> f32 {
        let (weighted, total) = polygons.iter().fold((0.0, 0.0), |(weighted, total), poly| {
            let k = if (poly.centroid - hull_center).dot(forward) > 0.0 {
                forward_k
            } else {
                back_k
            };
            (weighted + poly.area * (1.0 + k), total + poly.area)
        });

        if total > SMALL_NUMBER {
            weighted / total
        } else {
            1.0
        }
    }

    pub fn compute_force(&self, polygon: &SubmergedPolygon, ctx: &ForceContext) -> Vec3 {
        if self.force_constant == 0.0 {
            return Vec3::ZERO;
        }
        let direction = force_direction(polygon);
        if direction.dot(UP) < 0.0 || centroid_depth(polygon, ctx).is_none() {
            return Vec3::ZERO;
        }

        let normal = -direction;
        let flow = relative_velocity(polygon, ctx);
        let in_plane = flow - normal * flow.dot(normal);
        let tangential = in_plane.normalize_or_zero() * -flow.length();

        let newtons = tangential
            * self.force_constant
            * area_m2(polygon)
            * tangential.length()
            * self.k_factor;
        newtons * M_TO_UU
    }
}

/// `Re = ρ L v / μ` with L in metres and v in m/s.
pub fn reynolds_number(density: f32, length: f32, speed: f32) -> f32 {
    density * length * speed / SEAWATER_DYNAMIC_VISCOSITY
}

/// `0.5 ρ Cf` for the given Reynolds number, zero when it is negligible.
pub fn skin_friction_constant(reynolds: f32, density: f32) -> f32 {
    if !(reynolds > SMALL_NUMBER) {
        return 0.0;
    }
    let denominator = (reynolds.log10() - 2.0).powi(2);
    if denominator <= SMALL_NUMBER {
        return 0.0;
    }
    0.5 * density * SKIN_FRICTION_COEFFICIENT / denominator
}
