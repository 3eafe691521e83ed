//! Per-step kinematic snapshot read from the hosting body.

use bevy::math::Vec3;
use bevy::transform::components::Transform;

use crate::constants::UU_TO_M;

/// Read-only hull state for one step. Lengths and velocities are in host
/// units, angular velocity in rad/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// World-space centre of mass
    pub center_of_mass: Vec3,
    /// Half extents of the hull bounds
    pub half_extents: Vec3,
}

impl KinematicState {
    /// Hull at rest with its centre of mass at the transform origin.
    pub fn at_rest(transform: Transform, half_extents: Vec3) -> Self {
        Self {
            transform,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            center_of_mass: transform.translation,
            half_extents,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.transform.translation.is_finite()
            && self.transform.rotation.is_finite()
            && self.transform.scale.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
            && self.center_of_mass.is_finite()
            && self.half_extents.is_finite()
    }

    /// Velocity of a world point rigidly attached to the hull, in m/s.
    #[inline]
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        let arm = (point - self.center_of_mass) * UU_TO_M;
        self.linear_velocity * UU_TO_M + self.angular_velocity.cross(arm)
    }

    /// Hull speed in m/s.
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length() * UU_TO_M
    }
}

/// Supplies the hull's pose once per step.
pub trait MeshPoseProvider {
    fn transform(&self) -> Transform;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;
    fn center_of_mass(&self) -> Vec3;
    fn half_extents(&self) -> Vec3;

    fn snapshot(&self) -> KinematicState {
        KinematicState {
            transform: self.transform(),
            linear_velocity: self.linear_velocity(),
            angular_velocity: self.angular_velocity(),
            center_of_mass: self.center_of_mass(),
            half_extents: self.half_extents(),
        }
    }
}

impl MeshPoseProvider for KinematicState {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    fn snapshot(&self) -> KinematicState {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_velocity_translation_only() {
        let mut state = KinematicState::at_rest(Transform::IDENTITY, Vec3::ONE);
        state.linear_velocity = Vec3::new(200.0, 0.0, 0.0);
        assert_eq!(state.point_velocity(Vec3::new(50.0, 50.0, 0.0)), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_point_velocity_with_spin() {
        let mut state = KinematicState::at_rest(Transform::IDENTITY, Vec3::ONE);
        state.angular_velocity = Vec3::new(0.0, 0.0, 1.0);

        // 1 m ahead of the centre, spinning about +Z, moves along +Y
        let velocity = state.point_velocity(Vec3::new(100.0, 0.0, 0.0));
        assert_relative_eq!(velocity.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut state = KinematicState::at_rest(Transform::IDENTITY, Vec3::ONE);
        assert!(state.is_finite());
        state.angular_velocity.x = f32::NAN;
        assert!(!state.is_finite());
    }
}
