//! Small geometric queries shared by the force providers.

use bevy::math::Vec3;

use super::ForceContext;
use crate::constants::UU_TO_M;
use crate::hull::SubmergedPolygon;

/// Inward face direction of the polygon (zero for degenerate faces).
#[inline]
pub fn force_direction(polygon: &SubmergedPolygon) -> Vec3 {
    polygon.face_cross().normalize_or_zero()
}

/// Depth of the polygon centroid below the local water surface, in host
/// units. `None` when the centroid is dry or off the water domain.
#[inline]
pub fn centroid_depth(polygon: &SubmergedPolygon, ctx: &ForceContext) -> Option<f32> {
    let sample = ctx.water.sample_height(polygon.centroid.truncate(), ctx.time);
    if !sample.valid {
        return None;
    }
    let depth = sample.height() - polygon.centroid.z;
    (depth > 0.0).then_some(depth)
}

/// Velocity of the polygon centroid relative to the water, in m/s.
#[inline]
pub fn relative_velocity(polygon: &SubmergedPolygon, ctx: &ForceContext) -> Vec3 {
    ctx.kinematics.point_velocity(polygon.centroid) - ctx.water.velocity()
}

/// Polygon area in m².
#[inline]
pub fn area_m2(polygon: &SubmergedPolygon) -> f32 {
    polygon.area * UU_TO_M * UU_TO_M
}
