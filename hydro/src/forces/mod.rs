//! Force providers and the batched aggregator that sums them over a hull.
//!
//! Every provider maps one submerged polygon plus the read-only step
//! context to a force in host units. Providers hold only constants fixed
//! at initialisation, so a single instance is shared by every batch.

pub mod aggregate;
pub mod buoyancy;
pub mod commands;
pub mod helpers;
pub mod pressure;
pub mod viscous;

use bevy::math::Vec3;

pub use aggregate::{AggregateReport, BatchPlan, ForceAggregator, ForceContribution};
pub use buoyancy::Buoyancy;
pub use commands::{ForceCommand, PhysicsSink};
pub use pressure::PressureDrag;
pub use viscous::ViscousDrag;

use crate::hull::{KinematicState, SubmergedPolygon};
use crate::water::WaveField;

/// Read-only inputs shared by every provider during one step.
#[derive(Debug, Clone, Copy)]
pub struct ForceContext<'a> {
    pub water: &'a WaveField,
    pub kinematics: &'a KinematicState,
    /// World gravity along Z (cm/s²)
    pub gravity_z: f32,
    /// Simulation time (s)
    pub time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceProvider {
    Buoyancy(Buoyancy),
    Viscous(ViscousDrag),
    Pressure(PressureDrag),
}

impl ForceProvider {
    #[inline]
    pub fn compute_force(&self, polygon: &SubmergedPolygon, ctx: &ForceContext) -> Vec3 {
        match self {
            ForceProvider::Buoyancy(provider) => provider.compute_force(polygon, ctx),
            ForceProvider::Viscous(provider) => provider.compute_force(polygon, ctx),
            ForceProvider::Pressure(provider) => provider.compute_force(polygon, ctx),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ForceProvider::Buoyancy(_) => "buoyancy",
            ForceProvider::Viscous(_) => "viscous drag",
            ForceProvider::Pressure(_) => "pressure drag",
        }
    }
}
