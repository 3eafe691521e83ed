use crate::body::RigidHull;
use crate::scenario::Scenario;
use crate::systems::{hydro_step_system, integrate_system, progress_system, SimClock, SimHull, SimStats};
use bevy::prelude::*;
use bevy_app::ScheduleRunnerPlugin;
use hydro::{Helm, HullSimulation, HydroResult, WaveField};
use log::{error, info};
use std::time::Duration;

/// Run options that do not belong in the scenario file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Pace steps at `dt` wall-clock time instead of running flat out
    pub realtime: bool,
    /// Echo per-step stats to the debug log
    pub echo_stats: bool,
}

/// Insert the scenario's resources and systems into `app`.
pub fn setup_simulation(app: &mut App, scenario: &Scenario, options: RunOptions) -> HydroResult<()> {
    scenario.validate()?;

    let water = WaveField::new(scenario.wave.to_config())?;
    let mesh = scenario.hull.build_mesh()?;
    let mut simulation = HullSimulation::new(scenario.hydro.clone(), mesh)?;

    let body = RigidHull::new(
        scenario.body.mass,
        scenario.hull.half_extents(),
        scenario.body.transform(),
    )
    .with_velocity(scenario.body.velocity, scenario.body.angular_velocity);
    simulation.initialize(&body, &water)?;

    info!(
        "Scenario '{}': {} hull triangles, {} steps of {:.4}s",
        scenario.name,
        simulation.geometry().triangle_count(),
        scenario.steps,
        scenario.dt
    );

    app.insert_resource(water);
    app.insert_resource(SimClock::new(scenario.dt, scenario.steps));
    app.insert_resource(SimStats {
        echo: options.echo_stats,
        ..SimStats::default()
    });
    app.insert_resource(SimHull {
        helm: Helm::new(scenario.helm.config, scenario.hydro.forward_axis),
        throttle: scenario.helm.throttle,
        steering: scenario.helm.steering,
        body,
        simulation,
    });

    app.add_systems(
        Update,
        (hydro_step_system, integrate_system, progress_system).chain(),
    );

    Ok(())
}

pub fn init(scenario: Scenario, options: RunOptions) {
    let wait = if options.realtime {
        Duration::from_secs_f32(scenario.dt)
    } else {
        Duration::ZERO
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)));
    app.add_plugins(bevy::log::LogPlugin::default());

    if let Err(err) = setup_simulation(&mut app, &scenario, options) {
        error!("Could not set up scenario '{}': {err}", scenario.name);
        std::process::exit(1);
    }

    if let AppExit::Error(code) = app.run() {
        error!("Simulation exited with code {code}");
        std::process::exit(code.get().into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{HelmSpec, WaveSpec};
    use hydro::{HelmConfig, WavePreset};

    fn headless(scenario: &Scenario) -> App {
        let mut app = App::new();
        app.add_event::<AppExit>();
        setup_simulation(&mut app, scenario, RunOptions::default()).unwrap();
        app
    }

    #[test]
    fn test_hull_floats_in_calm_water() {
        let scenario = Scenario {
            steps: 240,
            ..Scenario::default()
        };
        let mut app = headless(&scenario);
        for _ in 0..240 {
            app.update();
        }

        let clock = app.world().resource::<SimClock>();
        assert_eq!(clock.step, 240);
        assert_eq!(clock.failed_steps, 0);

        let hull = app.world().resource::<SimHull>();
        let z = hull.body.transform.translation.z;
        assert!(z.is_finite());
        assert!(z > -150.0 && z < 150.0, "Hull should stay at the surface, z = {z}");
        assert!(app.world().resource::<SimStats>().table.get("Total Force").is_some());
    }

    #[test]
    fn test_throttle_moves_hull_forward() {
        let scenario = Scenario {
            wave: WaveSpec::Preset {
                preset: WavePreset::Still,
                base_z: 0.0,
            },
            helm: HelmSpec {
                config: HelmConfig {
                    acceleration: 200.0,
                    ..HelmConfig::default()
                },
                throttle: 1.0,
                steering: 0.0,
            },
            steps: 120,
            ..Scenario::default()
        };
        let mut app = headless(&scenario);
        for _ in 0..120 {
            app.update();
        }

        let hull = app.world().resource::<SimHull>();
        assert!(hull.body.linear_velocity.x > 0.0);
        assert!(hull.body.transform.translation.x > 0.0);
    }

    #[test]
    fn test_invalid_scenario_is_rejected() {
        let scenario = Scenario {
            dt: -1.0,
            ..Scenario::default()
        };
        let mut app = App::new();
        assert!(setup_simulation(&mut app, &scenario, RunOptions::default()).is_err());
    }
}
