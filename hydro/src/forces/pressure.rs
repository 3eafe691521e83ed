//! Pressure and suction drag on wetted faces.
//!
//! Faces moving into the water are pushed back along their normal, faces
//! moving away are sucked back. Both terms grow quadratically with
//! `speed / reference_speed` and fall off with the angle of attack.

use bevy::math::Vec3;

use super::helpers::{area_m2, centroid_depth, force_direction, relative_velocity};
use super::ForceContext;
use crate::config::PressureDragConfig;
use crate::constants::{M_TO_UU, SMALL_NUMBER, UP};
use crate::hull::SubmergedPolygon;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureDrag {
    config: PressureDragConfig,
}

impl PressureDrag {
    pub fn new(config: PressureDragConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PressureDragConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.reference_speed > 0.0
    }

    pub fn compute_force(&self, polygon: &SubmergedPolygon, ctx: &ForceContext) -> Vec3 {
        if !self.is_enabled() {
            return Vec3::ZERO;
        }
        let normal = -force_direction(polygon);
        if normal.dot(UP) >= 0.0 || centroid_depth(polygon, ctx).is_none() {
            return Vec3::ZERO;
        }

        let flow = relative_velocity(polygon, ctx);
        let speed = flow.length();
        if speed <= SMALL_NUMBER {
            return Vec3::ZERO;
        }

        let cosine = (normal.dot(flow) / speed).clamp(-1.0, 1.0);
        let ratio = speed / self.config.reference_speed;
        let area = area_m2(polygon);
        let c = &self.config;

        let magnitude = if cosine >= 0.0 {
            -(c.cpd1 * ratio + c.cpd2 * ratio * ratio) * area * cosine.powf(c.fp)
        } else {
            (c.csd1 * ratio + c.csd2 * ratio * ratio) * area * cosine.abs().powf(c.fs)
        };

        normal * magnitude * M_TO_UU
    }
}
