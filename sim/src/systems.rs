//! Per-frame systems: hydrodynamics, helm, integration and progress.

use bevy::prelude::*;
use bevy_ecs::resource::Resource;
use hydro::stats::{LogStatsSink, STAT_SUBMERGED_POLYGONS, STAT_TOTAL_FORCE};
use hydro::{DebugStatsSink, Helm, HullSimulation, MeshPoseProvider, PhysicsSink, StatsTable, WaveField};
use log::{debug, error, info};

use crate::body::RigidHull;

/// The simulated hull and everything that drives it.
#[derive(Resource)]
pub struct SimHull {
    pub body: RigidHull,
    pub simulation: HullSimulation,
    pub helm: Helm,
    pub throttle: f32,
    pub steering: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub dt: f32,
    pub step: u32,
    pub max_steps: u32,
    /// Log a progress line every this many steps
    pub report_every: u32,
    /// Steps whose hydrodynamics failed and applied no force
    pub failed_steps: u32,
}

impl SimClock {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            step: 0,
            max_steps,
            report_every: (1.0 / dt).round().max(1.0) as u32,
            failed_steps: 0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.step as f32 * self.dt
    }
}

#[derive(Resource, Debug, Default)]
pub struct SimStats {
    pub table: StatsTable,
    /// Echo every stat to the debug log each step
    pub echo: bool,
}

/// Hydrodynamic forces, then helm commands, into the body's accumulators.
pub fn hydro_step_system(
    water: Res<WaveField>,
    mut clock: ResMut<SimClock>,
    mut hull: ResMut<SimHull>,
    mut stats: ResMut<SimStats>,
) {
    let SimHull {
        body,
        simulation,
        helm,
        throttle,
        steering,
    } = &mut *hull;
    let SimStats { table, echo } = &mut *stats;

    let pose = body.snapshot();
    if let Err(err) = simulation.step(clock.dt, &water, &pose, body, Some(&mut *table)) {
        clock.failed_steps += 1;
        error!("Hydrodynamics failed at step {}: {err}", clock.step);
        return;
    }

    if *echo {
        let mut log_sink = LogStatsSink;
        for (name, value) in table.iter() {
            log_sink.set_stat(name, value);
        }
    }

    if let Some(command) = helm.throttle_force(*throttle, &pose, body.mass) {
        body.apply(command);
    }
    let rudder = simulation.rudder_reference(&pose.transform);
    if let Some(command) = helm.steering_torque(*steering, rudder, &pose) {
        body.apply(command);
    }
}

pub fn integrate_system(clock: Res<SimClock>, mut hull: ResMut<SimHull>) {
    let gravity_z = hull.simulation.config().gravity_z;
    if !hull.body.integrate(clock.dt, gravity_z) {
        debug!("Integration skipped at step {}", clock.step);
    }
}

/// Count steps, log progress, and stop the app once the run is over.
pub fn progress_system(
    mut clock: ResMut<SimClock>,
    hull: Res<SimHull>,
    stats: Res<SimStats>,
    mut exit: EventWriter<AppExit>,
) {
    clock.step += 1;

    let done = clock.step >= clock.max_steps;
    if done || clock.step % clock.report_every == 0 {
        let position = hull.body.transform.translation;
        info!(
            "t = {:>6.2}s  position ({:>8.1}, {:>8.1}, {:>6.1}) cm  speed {:>5.2} m/s  submerged {:>4}  force {:.3e}",
            clock.elapsed(),
            position.x,
            position.y,
            position.z,
            hull.body.linear_velocity.length() * hydro::UU_TO_M,
            stats.table.get(STAT_SUBMERGED_POLYGONS).unwrap_or(0.0),
            stats.table.get(STAT_TOTAL_FORCE).unwrap_or(0.0),
        );
    }

    if done {
        info!(
            "Finished {} steps ({} without hydrodynamics)",
            clock.step, clock.failed_steps
        );
        exit.write(AppExit::Success);
    }
}
