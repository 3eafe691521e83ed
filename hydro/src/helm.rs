//! Throttle and rudder commands for a driven hull.

use bevy::math::Vec3;

use crate::config::HelmConfig;
use crate::constants::SMALL_NUMBER;
use crate::forces::ForceCommand;
use crate::hull::{ForwardAxis, KinematicState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helm {
    config: HelmConfig,
    forward_axis: ForwardAxis,
}

impl Helm {
    pub fn new(config: HelmConfig, forward_axis: ForwardAxis) -> Self {
        Self {
            config,
            forward_axis,
        }
    }

    pub fn config(&self) -> &HelmConfig {
        &self.config
    }

    /// Push along the level projection of the bow direction while the hull
    /// is below its top speed. `axis` is the throttle input in [-1, 1].
    pub fn throttle_force(&self, axis: f32, kinematics: &KinematicState, mass: f32) -> Option<ForceCommand> {
        if axis.abs() <= SMALL_NUMBER || kinematics.speed() >= self.config.max_speed {
            return None;
        }

        let forward = kinematics.transform.rotation * self.forward_axis.local_direction();
        let level = forward.with_z(0.0).normalize_or_zero();
        if level == Vec3::ZERO {
            return None;
        }

        Some(ForceCommand::AddForceAtLocation {
            force: level * axis * self.config.acceleration * mass,
            location: kinematics.center_of_mass,
        })
    }

    /// Lateral rudder force at `rudder_world`, returned as a torque about
    /// the centre of mass. `axis` is the steering input in [-1, 1].
    pub fn steering_torque(
        &self,
        axis: f32,
        rudder_world: Vec3,
        kinematics: &KinematicState,
    ) -> Option<ForceCommand> {
        if axis.abs() <= SMALL_NUMBER {
            return None;
        }

        let local = match self.forward_axis {
            ForwardAxis::PositiveY => Vec3::new(-axis, 0.0, 0.0),
            ForwardAxis::NegativeY => Vec3::new(axis, 0.0, 0.0),
            ForwardAxis::PositiveX => Vec3::new(0.0, axis, 0.0),
            ForwardAxis::NegativeX => Vec3::new(0.0, -axis, 0.0),
        };
        let direction = (kinematics.transform.rotation * local).normalize_or_zero();
        let arm = rudder_world - kinematics.center_of_mass;

        Some(ForceCommand::AddTorque {
            torque: arm.cross(direction * self.config.turn_torque),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::math::Quat;
    use bevy::transform::components::Transform;

    fn kinematics() -> KinematicState {
        KinematicState::at_rest(Transform::IDENTITY, Vec3::new(200.0, 100.0, 50.0))
    }

    #[test]
    fn test_throttle_pushes_forward() {
        let helm = Helm::new(HelmConfig::default(), ForwardAxis::PositiveX);
        let Some(ForceCommand::AddForceAtLocation { force, location }) =
            helm.throttle_force(1.0, &kinematics(), 500.0)
        else {
            panic!("Expected a throttle force");
        };
        assert_relative_eq!(force.x, 1000.0 * 500.0);
        assert_eq!(force.z, 0.0);
        assert_eq!(location, Vec3::ZERO);
    }

    #[test]
    fn test_throttle_ignores_pitch() {
        let helm = Helm::new(HelmConfig::default(), ForwardAxis::PositiveX);
        let mut state = kinematics();
        state.transform.rotation = Quat::from_rotation_y(-0.3);

        let Some(ForceCommand::AddForceAtLocation { force, .. }) = helm.throttle_force(0.5, &state, 1.0) else {
            panic!("Expected a throttle force");
        };
        assert_eq!(force.z, 0.0);
        assert_relative_eq!(force.x, 500.0, epsilon = 1e-3);
    }

    #[test]
    fn test_throttle_cuts_out_at_top_speed() {
        let helm = Helm::new(HelmConfig::default(), ForwardAxis::PositiveX);
        let mut state = kinematics();
        state.linear_velocity = Vec3::new(1000.0, 0.0, 0.0);
        assert!(helm.throttle_force(1.0, &state, 500.0).is_none());
        assert!(helm.throttle_force(0.0, &kinematics(), 500.0).is_none());
    }

    #[test]
    fn test_rudder_turns_stern_sideways() {
        let helm = Helm::new(HelmConfig::default(), ForwardAxis::PositiveX);
        let rudder = Vec3::new(-200.0, 0.0, -50.0);

        let Some(ForceCommand::AddTorque { torque }) = helm.steering_torque(1.0, rudder, &kinematics()) else {
            panic!("Expected a rudder torque");
        };
        // stern pushed to +Y yaws the bow to -Y
        assert!(torque.z < 0.0, "{torque:?}");
        assert_relative_eq!(torque.z, -200.0 * 1000.0, epsilon = 1e-2);
    }

    #[test]
    fn test_rudder_input_sign_flips_torque() {
        let helm = Helm::new(HelmConfig::default(), ForwardAxis::PositiveY);
        let rudder = Vec3::new(0.0, -100.0, -50.0);
        let torque = |axis| match helm.steering_torque(axis, rudder, &kinematics()) {
            Some(ForceCommand::AddTorque { torque }) => torque,
            other => panic!("Unexpected {other:?}"),
        };
        assert_relative_eq!(torque(1.0).z, -torque(-1.0).z);
    }
}
