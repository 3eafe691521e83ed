//! Hydrodynamic forces on rigid hulls in a procedural wave field.
//!
//! Per step: hull triangles are moved into world space, clipped against
//! the local water height, run through the buoyancy and drag providers in
//! parallel batches, and reduced to one force at the centre of mass plus
//! one torque. Z is up; lengths are centimetres and forces centinewtons at
//! every public boundary.

pub mod config;
pub mod constants;
pub mod error;
pub mod forces;
pub mod helm;
pub mod hull;
pub mod physics;
pub mod simulation;
pub mod stats;
pub mod water;

pub use config::{
    AggregatorConfig, HelmConfig, HydroConfig, IntegratedKConfig, PressureDragConfig,
    ViscousDragConfig,
};
pub use constants::*;
pub use error::{HydroError, HydroResult};
pub use forces::{ForceCommand, ForceContribution, PhysicsSink};
pub use helm::Helm;
pub use hull::{ForwardAxis, HullMesh, KinematicState, MeshPoseProvider};
pub use simulation::{HullSimulation, StepReport};
pub use stats::{DebugStatsSink, LogStatsSink, StatsTable};
pub use water::{WaveConfig, WavePreset, WaveTerm, WaveField, WaterSample};
