//! Rapier integration for hydrodynamic hulls.
//!
//! Each hull entity carries a `HydroHull` next to its rapier body. Once per
//! frame `apply_hull_forces` snapshots the body, steps the hull against the
//! `WaveField` resource and writes the result into the body's
//! `ExternalForce`. World units are centimetres, matching the core.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use log::error;

use crate::constants::DEFAULT_GRAVITY_Z;
use crate::forces::{ForceContribution, PhysicsSink};
use crate::hull::MeshPoseProvider;
use crate::simulation::HullSimulation;
use crate::water::WaveField;

/// Hydrodynamics state of one rapier body.
#[derive(Component, Debug, Clone)]
pub struct HydroHull(pub HullSimulation);

/// Pose of a rapier body, read once per step.
#[derive(Debug, Clone, Copy)]
pub struct RapierHullPose {
    transform: Transform,
    velocity: Velocity,
    center_of_mass: Vec3,
    half_extents: Vec3,
}

impl RapierHullPose {
    pub fn new(
        global: &GlobalTransform,
        velocity: &Velocity,
        mass_properties: &ReadMassProperties,
        local_half_extents: Vec3,
    ) -> Self {
        let transform = global.compute_transform();
        Self {
            transform,
            velocity: *velocity,
            center_of_mass: transform.transform_point(mass_properties.get().local_center_of_mass),
            half_extents: local_half_extents * transform.scale.abs(),
        }
    }
}

impl MeshPoseProvider for RapierHullPose {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn angular_velocity(&self) -> Vec3 {
        self.velocity.angvel
    }

    fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    fn half_extents(&self) -> Vec3 {
        self.half_extents
    }
}

/// Accumulates commands into a body's `ExternalForce`.
pub struct ExternalForceSink<'a> {
    external: &'a mut ExternalForce,
    center_of_mass: Vec3,
}

impl<'a> ExternalForceSink<'a> {
    pub fn new(external: &'a mut ExternalForce, center_of_mass: Vec3) -> Self {
        Self {
            external,
            center_of_mass,
        }
    }
}

impl PhysicsSink for ExternalForceSink<'_> {
    fn add_force_at_location(&mut self, force: Vec3, location: Vec3) {
        let contribution = ForceContribution::at_point(force, location, self.center_of_mass);
        self.external.force += contribution.force;
        self.external.torque += contribution.torque;
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.external.torque += torque;
    }
}

/// Bundle for a floating, dynamic hull.
#[derive(Bundle)]
pub struct HullPhysicsBundle {
    pub body: RigidBody,
    pub collider: Collider,
    pub mass: ColliderMassProperties,
    pub velocity: Velocity,
    pub external_force: ExternalForce,
    pub mass_properties: ReadMassProperties,
    pub damping: Damping,
    pub hull: HydroHull,
}

impl HullPhysicsBundle {
    /// Box collider around the hull mesh with the given mass (kg).
    pub fn new(simulation: HullSimulation, mass: f32) -> Self {
        let half = simulation.geometry().mesh().half_extents();
        Self {
            body: RigidBody::Dynamic,
            collider: Collider::cuboid(half.x, half.y, half.z),
            mass: ColliderMassProperties::Mass(mass),
            velocity: Velocity::zero(),
            external_force: ExternalForce::default(),
            mass_properties: ReadMassProperties::default(),
            // the water supplies all drag
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            hull: HydroHull(simulation),
        }
    }
}

/// World gravity handed to rapier, in cm/s².
#[derive(Resource, Clone, Copy, Debug)]
pub struct HydroPhysicsConfig {
    pub gravity_z: f32,
}

impl Default for HydroPhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_z: DEFAULT_GRAVITY_Z,
        }
    }
}

/// Rapier plus the hull force system. Expects a `WaveField` resource.
#[derive(Default)]
pub struct HydroPhysicsPlugin {
    pub config: HydroPhysicsConfig,
}

impl Plugin for HydroPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            RapierPhysicsPlugin::<NoUserData>::default().with_default_system_setup(true),
        );
        app.insert_resource(self.config);
        app.add_systems(Startup, configure_rapier_context);
        app.add_systems(Update, (initialize_hulls, apply_hull_forces).chain());
    }
}

/// Z-up gravity once the rapier context exists.
fn configure_rapier_context(
    settings: Res<HydroPhysicsConfig>,
    mut query: Query<&mut RapierConfiguration>,
) {
    for mut config in query.iter_mut() {
        config.gravity = Vec3::new(0.0, 0.0, settings.gravity_z);
        config.physics_pipeline_active = true;
        config.query_pipeline_active = true;
    }
}

/// Calibrate hulls that have not been initialised yet from their current
/// pose. Hulls that fail stay uninitialised and get no forces.
pub fn initialize_hulls(
    water: Option<Res<WaveField>>,
    mut hulls: Query<(
        Entity,
        &mut HydroHull,
        &GlobalTransform,
        &Velocity,
        &ReadMassProperties,
    )>,
) {
    let Some(water) = water else {
        return;
    };

    for (entity, mut hull, global, velocity, mass_properties) in hulls.iter_mut() {
        if hull.0.is_initialized() {
            continue;
        }
        let half_extents = hull.0.geometry().mesh().half_extents();
        let pose = RapierHullPose::new(global, velocity, mass_properties, half_extents);
        if let Err(err) = hull.0.initialize(&pose, &water) {
            error!("Hull {entity} could not be initialised: {err}");
        }
    }
}

/// Replace each hull's external force with this frame's hydrodynamics.
/// A failed step, including one on a hull that was never initialised,
/// leaves the hull with no external force for the frame.
pub fn apply_hull_forces(
    time: Res<Time>,
    water: Option<Res<WaveField>>,
    mut hulls: Query<(
        Entity,
        &mut HydroHull,
        &GlobalTransform,
        &Velocity,
        &ReadMassProperties,
        &mut ExternalForce,
    )>,
) {
    let Some(water) = water else {
        return;
    };
    let dt = time.delta_secs();

    for (entity, mut hull, global, velocity, mass_properties, mut external) in hulls.iter_mut() {
        let half_extents = hull.0.geometry().mesh().half_extents();
        let pose = RapierHullPose::new(global, velocity, mass_properties, half_extents);

        *external = ExternalForce::default();
        let mut sink = ExternalForceSink::new(&mut external, pose.center_of_mass());
        if let Err(err) = hull.0.step(dt, &water, &pose, &mut sink, None) {
            error!("Hull {entity} skipped this frame: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HydroConfig;
    use crate::hull::HullMesh;

    fn simulation() -> HullSimulation {
        let mesh = HullMesh::box_hull(400.0, 200.0, 100.0, 2).unwrap();
        HullSimulation::new(HydroConfig::buoyancy_only(), mesh).unwrap()
    }

    #[test]
    fn test_hull_bundle_creation() {
        let bundle = HullPhysicsBundle::new(simulation(), 500.0);
        assert!(matches!(bundle.body, RigidBody::Dynamic));
        assert!(matches!(bundle.mass, ColliderMassProperties::Mass(m) if m == 500.0));
    }

    #[test]
    fn test_sink_offsets_torque_from_center_of_mass() {
        let mut external = ExternalForce::default();
        let mut sink = ExternalForceSink::new(&mut external, Vec3::new(0.0, 0.0, 10.0));
        sink.add_force_at_location(Vec3::Z * 2.0, Vec3::new(1.0, 0.0, 10.0));
        sink.add_torque(Vec3::X);

        assert_eq!(external.force, Vec3::Z * 2.0);
        assert_eq!(external.torque, Vec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn test_pose_reads_rapier_components() {
        let global = GlobalTransform::from(Transform::from_xyz(5.0, 0.0, -20.0));
        let velocity = Velocity {
            linvel: Vec3::X * 100.0,
            angvel: Vec3::Z,
        };
        let pose = RapierHullPose::new(&global, &velocity, &ReadMassProperties::default(), Vec3::ONE);

        let state = pose.snapshot();
        assert_eq!(state.center_of_mass, Vec3::new(5.0, 0.0, -20.0));
        assert_eq!(state.linear_velocity, Vec3::X * 100.0);
        assert_eq!(state.angular_velocity, Vec3::Z);
    }

    #[test]
    fn test_system_writes_external_force() {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.insert_resource(WaveField::still(Vec2::splat(-5000.0), 0.0));
        app.add_systems(Update, (initialize_hulls, apply_hull_forces).chain());

        let entity = app
            .world_mut()
            .spawn((
                HydroHull(simulation()),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0)),
                Velocity::zero(),
                ReadMassProperties::default(),
                ExternalForce {
                    force: Vec3::X * 1.0e6,
                    torque: Vec3::ZERO,
                },
            ))
            .id();

        app.update();

        assert!(app.world().get::<HydroHull>(entity).unwrap().0.is_initialized());
        let external = app.world().get::<ExternalForce>(entity).unwrap();
        assert!(external.force.z > 0.0, "Submerged hull should be lifted");
        assert!(external.force.x.abs() < 1.0, "Stale force should be replaced");
    }

    #[test]
    fn test_uninitialized_hull_gets_no_force() {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.insert_resource(WaveField::still(Vec2::splat(-5000.0), 0.0));
        app.add_systems(Update, apply_hull_forces);

        let entity = app
            .world_mut()
            .spawn((
                HydroHull(simulation()),
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 0.0)),
                Velocity::zero(),
                ReadMassProperties::default(),
                ExternalForce {
                    force: Vec3::X * 1.0e6,
                    torque: Vec3::ZERO,
                },
            ))
            .id();

        app.update();

        assert!(!app.world().get::<HydroHull>(entity).unwrap().0.is_initialized());
        let external = app.world().get::<ExternalForce>(entity).unwrap();
        assert_eq!(external.force, Vec3::ZERO);
        assert_eq!(external.torque, Vec3::ZERO);
    }
}
