//! Per-hull simulation driver.
//!
//! `HullSimulation` owns the hull geometry and the configured providers.
//! The host calls `step` once per physics frame; everything that only
//! depends on the hull shape or the starting state is fixed beforehand in
//! `new` and `initialize`.

use bevy::math::Vec3;
use bevy::transform::components::Transform;
use log::{debug, info, warn};

use crate::config::{HydroConfig, IntegratedKConfig};
use crate::constants::UU_TO_M;
use crate::error::{HydroError, HydroResult};
use crate::forces::{
    Buoyancy, ForceAggregator, ForceContext, ForceContribution, ForceProvider, PhysicsSink,
    PressureDrag, ViscousDrag,
};
use crate::hull::{clip_triangle, HullGeometry, HullMesh, KinematicState, MeshPoseProvider, Triangle};
use crate::stats::{
    DebugStatsSink, STAT_ANGULAR_VELOCITY, STAT_SUBMERGED_POLYGONS, STAT_TOTAL_FORCE,
    STAT_TOTAL_TORQUE, STAT_VELOCITY,
};
use crate::water::WaveField;

/// Outcome of one successful step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Simulation time after the step (s)
    pub time: f32,
    pub contribution: ForceContribution,
    pub submerged_polygons: usize,
    pub triangles: usize,
    pub batches: usize,
}

#[derive(Debug, Clone)]
pub struct HullSimulation {
    config: HydroConfig,
    geometry: HullGeometry,
    aggregator: ForceAggregator,
    /// World triangles, rebuilt in place every step
    triangles: Vec<Triangle>,
    time: f32,
    initialized: bool,
}

impl HullSimulation {
    pub fn new(config: HydroConfig, mesh: HullMesh) -> HydroResult<Self> {
        config.validate()?;

        let mut providers = Vec::with_capacity(3);
        if config.buoyancy {
            providers.push(ForceProvider::Buoyancy(Buoyancy::new(config.fluid_density)));
        }
        if let Some(viscous) = &config.viscous {
            providers.push(ForceProvider::Viscous(ViscousDrag::new(
                viscous,
                config.fluid_density,
            )));
        }
        if let Some(pressure) = config.pressure {
            providers.push(ForceProvider::Pressure(PressureDrag::new(pressure)));
        }
        if providers.is_empty() {
            warn!("Hull simulation has no force providers enabled");
        }

        let geometry = HullGeometry::new(mesh, config.forward_axis);
        let aggregator = ForceAggregator::new(providers, config.aggregator);

        Ok(Self {
            triangles: Vec::with_capacity(geometry.triangle_count()),
            config,
            geometry,
            aggregator,
            time: 0.0,
            initialized: false,
        })
    }

    pub fn config(&self) -> &HydroConfig {
        &self.config
    }

    pub fn geometry(&self) -> &HullGeometry {
        &self.geometry
    }

    pub fn aggregator(&self) -> &ForceAggregator {
        &self.aggregator
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn rudder_reference(&self, transform: &Transform) -> Vec3 {
        self.geometry.rudder_reference(transform)
    }

    /// Fix the viscous Reynolds number (and optionally the integrated form
    /// factor) from the starting state. Must run before the first `step`.
    pub fn initialize(&mut self, pose: &impl MeshPoseProvider, water: &WaveField) -> HydroResult<()> {
        let kinematics = pose.snapshot();
        if !kinematics.is_finite() {
            return Err(HydroError::NonFiniteKinematics);
        }

        if let Some(viscous) = self.config.viscous.clone() {
            let speed = viscous.calibration_speed.unwrap_or_else(|| {
                (kinematics.linear_velocity * UU_TO_M - water.velocity()).length()
            });
            let k_factor = viscous
                .integrated_k
                .map(|integrated| self.integrated_k_factor(&kinematics, water, integrated));

            for provider in self.aggregator.providers_mut() {
                if let ForceProvider::Viscous(drag) = provider {
                    drag.calibrate(speed, kinematics.half_extents);
                    if let Some(k_factor) = k_factor {
                        drag.set_k_factor(k_factor);
                    }
                    info!(
                        "Viscous drag calibrated at {speed:.2} m/s: Re = {:.3e}, 1 + k = {:.3}",
                        drag.reynolds_number(),
                        drag.k_factor()
                    );
                }
            }
        }

        self.initialized = true;
        Ok(())
    }

    fn integrated_k_factor(
        &mut self,
        kinematics: &KinematicState,
        water: &WaveField,
        integrated: IntegratedKConfig,
    ) -> f32 {
        self.geometry
            .world_triangles_into(&kinematics.transform, &mut self.triangles);

        let polygons: Vec<_> = self
            .triangles
            .iter()
            .map(|triangle| {
                let sample = water.sample_height(triangle.centroid().truncate(), self.time);
                clip_triangle(triangle, &sample)
            })
            .filter(|polygon| !polygon.is_empty())
            .collect();

        ViscousDrag::integrated_k_factor(
            &polygons,
            kinematics.center_of_mass,
            self.geometry.world_forward(&kinematics.transform),
            integrated.forward_k,
            integrated.back_k,
        )
    }

    /// Advance time by `dt`, aggregate every provider over the hull and hand
    /// the resultant force and torque to `sink`.
    ///
    /// On error nothing is sent to the sink.
    pub fn step(
        &mut self,
        dt: f32,
        water: &WaveField,
        pose: &impl MeshPoseProvider,
        sink: &mut impl PhysicsSink,
        stats: Option<&mut dyn DebugStatsSink>,
    ) -> HydroResult<StepReport> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(HydroError::InvalidConfig(format!(
                "step delta must be non-negative, got {dt}"
            )));
        }
        if !self.initialized {
            return Err(HydroError::InvalidConfig(
                "hull simulation stepped before initialize".into(),
            ));
        }

        let kinematics = pose.snapshot();
        if !kinematics.is_finite() {
            return Err(HydroError::NonFiniteKinematics);
        }
        self.time += dt;

        self.geometry
            .world_triangles_into(&kinematics.transform, &mut self.triangles);
        let ctx = ForceContext {
            water,
            kinematics: &kinematics,
            gravity_z: self.config.gravity_z,
            time: self.time,
        };
        let report = self.aggregator.aggregate(&self.triangles, &ctx)?;
        let contribution = report.contribution;

        ForceAggregator::emit(&contribution, kinematics.center_of_mass, sink);

        if let Some(stats) = stats {
            stats.set_stat(STAT_VELOCITY, kinematics.speed());
            stats.set_stat(STAT_ANGULAR_VELOCITY, kinematics.angular_velocity.length());
            stats.set_stat(STAT_SUBMERGED_POLYGONS, report.submerged_polygons as f32);
            stats.set_stat(STAT_TOTAL_FORCE, contribution.force.length());
            stats.set_stat(STAT_TOTAL_TORQUE, contribution.torque.length());
        }

        debug!(
            "t = {:.3}s: {}/{} triangles submerged in {} batches, force {:?}, torque {:?}",
            self.time,
            report.submerged_polygons,
            self.triangles.len(),
            report.batches,
            contribution.force,
            contribution.torque
        );

        Ok(StepReport {
            time: self.time,
            contribution,
            submerged_polygons: report.submerged_polygons,
            triangles: self.triangles.len(),
            batches: report.batches,
        })
    }
}
