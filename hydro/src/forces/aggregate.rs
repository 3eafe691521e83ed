//! Batched force/torque reduction over a hull's triangles.
//!
//! Triangles are split into contiguous batches that run on bevy's compute
//! task pool. Each batch sums into a local total and merges it into the
//! shared total once, so the lock is taken once per batch rather than once
//! per triangle. The task scope is the barrier: `aggregate` only returns
//! after every batch has merged.

use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::{Mutex, PoisonError};

use bevy::math::Vec3;
use bevy::tasks::{available_parallelism, ComputeTaskPool, TaskPool};
use log::warn;

use super::commands::PhysicsSink;
use super::{ForceContext, ForceProvider};
use crate::config::AggregatorConfig;
use crate::constants::{LARGE_HULL_TRIANGLES, MEDIUM_HULL_TRIANGLES};
use crate::error::{HydroError, HydroResult};
use crate::hull::{clip_triangle, Triangle};

/// A force and the torque it produces about the centre of mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceContribution {
    pub force: Vec3,
    pub torque: Vec3,
}

impl ForceContribution {
    pub const ZERO: Self = Self {
        force: Vec3::ZERO,
        torque: Vec3::ZERO,
    };

    /// `force` applied at `point`, with torque about `center_of_mass`.
    pub fn at_point(force: Vec3, point: Vec3, center_of_mass: Vec3) -> Self {
        Self {
            force,
            torque: (point - center_of_mass).cross(force),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.force.is_finite() && self.torque.is_finite()
    }
}

impl Add for ForceContribution {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
        }
    }
}

impl AddAssign for ForceContribution {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

impl Sum for ForceContribution {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Totals for one aggregate call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateReport {
    pub contribution: ForceContribution,
    /// Triangles that produced a non-empty submerged polygon
    pub submerged_polygons: usize,
    pub batches: usize,
}

impl AggregateReport {
    fn merge(&mut self, other: AggregateReport) {
        self.contribution += other.contribution;
        self.submerged_polygons += other.submerged_polygons;
        self.batches += other.batches;
    }
}

/// How a triangle set is split across tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub batch_count: usize,
    pub batch_size: usize,
}

impl BatchPlan {
    /// Scale the batch count with `cores`: once per core for small hulls,
    /// twice for medium, three times for large. A fixed `batch_size`
    /// overrides the scaling.
    pub fn new(triangles: usize, cores: usize, batch_size: Option<usize>) -> Self {
        if triangles == 0 {
            return Self {
                batch_count: 0,
                batch_size: batch_size.unwrap_or(1).max(1),
            };
        }

        let batch_size = match batch_size {
            Some(size) => size.max(1),
            None => {
                let cores = cores.max(1);
                let batches = if triangles <= MEDIUM_HULL_TRIANGLES {
                    cores
                } else if triangles < LARGE_HULL_TRIANGLES {
                    cores * 2
                } else {
                    cores * 3
                };
                triangles.div_ceil(batches).max(1)
            }
        };

        Self {
            batch_count: triangles.div_ceil(batch_size),
            batch_size,
        }
    }
}

/// Runs every active provider over every submerged triangle.
#[derive(Debug, Clone)]
pub struct ForceAggregator {
    providers: Vec<ForceProvider>,
    config: AggregatorConfig,
}

impl ForceAggregator {
    pub fn new(providers: Vec<ForceProvider>, config: AggregatorConfig) -> Self {
        Self { providers, config }
    }

    pub fn providers(&self) -> &[ForceProvider] {
        &self.providers
    }

    pub fn providers_mut(&mut self) -> &mut [ForceProvider] {
        &mut self.providers
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn plan(&self, triangles: usize) -> BatchPlan {
        BatchPlan::new(triangles, available_parallelism(), self.config.batch_size)
    }

    /// Sum forces and torques over `triangles`, in parallel batches.
    pub fn aggregate(&self, triangles: &[Triangle], ctx: &ForceContext) -> HydroResult<AggregateReport> {
        if triangles.is_empty() {
            return Err(HydroError::EmptyHull);
        }
        if !ctx.kinematics.is_finite() {
            return Err(HydroError::NonFiniteKinematics);
        }

        let plan = self.plan(triangles.len());
        let totals = Mutex::new(AggregateReport::default());

        let pool = ComputeTaskPool::get_or_init(TaskPool::default);
        pool.scope(|scope| {
            for batch in triangles.chunks(plan.batch_size) {
                let totals = &totals;
                scope.spawn(async move {
                    let local = self.aggregate_batch(batch, ctx);
                    totals
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .merge(local);
                });
            }
        });

        Ok(totals.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    /// Sequential sum over one batch.
    pub fn aggregate_batch(&self, batch: &[Triangle], ctx: &ForceContext) -> AggregateReport {
        let mut report = AggregateReport {
            batches: 1,
            ..AggregateReport::default()
        };

        for triangle in batch {
            if let Some(contribution) = self.evaluate_triangle(triangle, ctx) {
                report.contribution += contribution;
                report.submerged_polygons += 1;
            }
        }

        report
    }

    /// Clip one triangle and run every provider on what is under water.
    /// `None` when nothing is submerged.
    pub fn evaluate_triangle(&self, triangle: &Triangle, ctx: &ForceContext) -> Option<ForceContribution> {
        let sample = ctx
            .water
            .sample_height(triangle.centroid().truncate(), ctx.time);
        let polygon = clip_triangle(triangle, &sample);
        if polygon.is_empty() {
            return None;
        }

        let mut force = Vec3::ZERO;
        for provider in &self.providers {
            let provider_force = provider.compute_force(&polygon, ctx);
            debug_assert!(
                provider_force.is_finite(),
                "{} produced {provider_force:?} for {polygon:?}",
                provider.name()
            );
            if !provider_force.is_finite() {
                warn!("Skipping non-finite {} force on {polygon:?}", provider.name());
                continue;
            }
            force += provider_force;
        }

        Some(ForceContribution::at_point(
            force,
            polygon.centroid,
            ctx.kinematics.center_of_mass,
        ))
    }

    /// Hand the two resultant commands to the physics sink.
    pub fn emit(contribution: &ForceContribution, center_of_mass: Vec3, sink: &mut impl PhysicsSink) {
        sink.add_force_at_location(contribution.force, center_of_mass);
        sink.add_torque(contribution.torque);
    }
}
