//! Host physics engine adapters.

pub mod rapier;

pub use rapier::{
    apply_hull_forces, initialize_hulls, ExternalForceSink, HullPhysicsBundle, HydroHull,
    HydroPhysicsConfig, HydroPhysicsPlugin, RapierHullPose,
};
