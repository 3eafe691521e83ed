//! Minimal rigid body standing in for the host physics engine.

use bevy::math::{Mat3, Quat, Vec3};
use bevy::transform::components::Transform;
use hydro::forces::ForceContribution;
use hydro::{MeshPoseProvider, PhysicsSink};
use log::error;

/// A rigid hull with a diagonal inertia tensor, integrated with
/// semi-implicit Euler. Units: kg, cm, s.
#[derive(Debug, Clone)]
pub struct RigidHull {
    pub mass: f32,
    /// Principal moments in the local frame (kg·cm²)
    pub inertia: Vec3,
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub half_extents: Vec3,
    force: Vec3,
    torque: Vec3,
}

impl RigidHull {
    /// Solid box of the given half extents.
    pub fn new(mass: f32, half_extents: Vec3, transform: Transform) -> Self {
        let h2 = half_extents * half_extents;
        let inertia = Vec3::new(h2.y + h2.z, h2.x + h2.z, h2.x + h2.y) * (mass / 3.0);

        Self {
            mass,
            inertia,
            transform,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            half_extents,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    /// Force and torque accumulated since the last integration.
    pub fn pending(&self) -> ForceContribution {
        ForceContribution {
            force: self.force,
            torque: self.torque,
        }
    }

    fn is_finite(&self) -> bool {
        self.transform.translation.is_finite()
            && self.transform.rotation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
            && self.force.is_finite()
            && self.torque.is_finite()
    }

    /// Advance by `dt` under the accumulated loads and gravity, then clear
    /// the accumulators. Returns false (and leaves the pose untouched)
    /// when the state has gone non-finite.
    pub fn integrate(&mut self, dt: f32, gravity_z: f32) -> bool {
        if !self.is_finite() {
            error!("Hull has NaN position, velocity or load, skipping integration");
            self.clear_loads();
            return false;
        }

        let acceleration = self.force / self.mass + Vec3::new(0.0, 0.0, gravity_z);
        self.linear_velocity += acceleration * dt;
        self.transform.translation += self.linear_velocity * dt;

        let rotation = Mat3::from_quat(self.transform.rotation);
        let inertia_world = rotation * Mat3::from_diagonal(self.inertia) * rotation.transpose();
        let momentum = inertia_world * self.angular_velocity;
        let gyroscopic = self.angular_velocity.cross(momentum);
        let angular_acceleration = inertia_world.inverse() * (self.torque - gyroscopic);
        self.angular_velocity += angular_acceleration * dt;

        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.transform.rotation = (spin * self.transform.rotation).normalize();

        self.clear_loads();
        true
    }

    fn clear_loads(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

impl MeshPoseProvider for RigidHull {
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
        self.transform.translation
    }

    fn half_extents(&self) -> Vec3 {
        self.half_extents
    }
}

impl PhysicsSink for RigidHull {
    fn add_force_at_location(&mut self, force: Vec3, location: Vec3) {
        let load = ForceContribution::at_point(force, location, self.center_of_mass());
        self.force += load.force;
        self.torque += load.torque;
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }
}
