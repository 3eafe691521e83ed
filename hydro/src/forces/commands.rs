//! Commands handed to the host physics engine.

use bevy::math::Vec3;

/// One resultant action, in host force units (N × 100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceCommand {
    AddForceAtLocation { force: Vec3, location: Vec3 },
    AddTorque { torque: Vec3 },
}

/// Receives forces and torques from the hydrodynamics step.
pub trait PhysicsSink {
    fn add_force_at_location(&mut self, force: Vec3, location: Vec3);
    fn add_torque(&mut self, torque: Vec3);

    fn apply(&mut self, command: ForceCommand) {
        match command {
            ForceCommand::AddForceAtLocation { force, location } => {
                self.add_force_at_location(force, location)
            }
            ForceCommand::AddTorque { torque } => self.add_torque(torque),
        }
    }
}

/// Records commands in order.
impl PhysicsSink for Vec<ForceCommand> {
    fn add_force_at_location(&mut self, force: Vec3, location: Vec3) {
        self.push(ForceCommand::AddForceAtLocation { force, location });
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.push(ForceCommand::AddTorque { torque });
    }
}
