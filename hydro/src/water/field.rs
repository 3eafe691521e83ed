//! Analytic wave field queried by every force provider.
//!
//! The height query is a plain sum of sines: it is called once per hull
//! triangle per step, so it skips the horizontal Gerstner displacement.
//! `surface_normal` and `displaced_position` evaluate the full trochoidal
//! surface for callers that animate or inspect the ocean mesh.

use super::config::{WaveConfig, WaveTerm};
use crate::constants::UU_TO_M;
use crate::error::HydroResult;
use bevy::math::{Vec2, Vec3};
use bevy_ecs::resource::Resource;

/// Result of a water surface query at a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSample {
    /// Queried XY with the water height in Z
    pub position: Vec3,
    /// Surface normal (always +Z from the cheap height query)
    pub normal: Vec3,
    /// False when the query point lies outside the simulated domain
    pub valid: bool,
}

impl WaterSample {
    pub const INVALID: Self = Self {
        position: Vec3::ZERO,
        normal: Vec3::ZERO,
        valid: false,
    };

    #[inline]
    pub fn height(&self) -> f32 {
        self.position.z
    }
}

impl Default for WaterSample {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Precomputed constants for a single wave term.
#[derive(Debug, Clone, Copy)]
struct TermConstants {
    /// Wave number k = 2π / wavelength
    k: f32,
    /// speed * k
    phase_rate: f32,
    amplitude: f32,
    /// Clamped Gerstner steepness, only used by the displaced surface
    q: f32,
    direction: Vec2,
}

impl TermConstants {
    fn new(term: &WaveTerm, term_count: usize) -> Self {
        let k = term.wave_number();
        let denom = k * term.amplitude * term_count as f32;
        let q = if denom.abs() > f32::EPSILON {
            (term.steepness / denom).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            k,
            phase_rate: term.phase_rate(),
            amplitude: term.amplitude,
            q,
            direction: term.direction,
        }
    }

    #[inline(always)]
    fn phase(&self, local: Vec2, time: f32) -> f32 {
        self.k * self.direction.dot(local) + self.phase_rate * time
    }
}

/// Wave height and velocity oracle.
///
/// Immutable once built, so one instance is shared read-only by every
/// concurrent batch in a step.
#[derive(Resource, Debug, Clone)]
pub struct WaveField {
    config: WaveConfig,
    terms: Vec<TermConstants>,
    /// Bulk water velocity in m/s, fixed for the run
    velocity: Vec3,
}

impl WaveField {
    /// Build a field from configuration, validating every term.
    pub fn new(mut config: WaveConfig) -> HydroResult<Self> {
        config.validate()?;

        let terms = config
            .terms
            .iter()
            .map(|term| TermConstants::new(term, config.terms.len()))
            .collect();

        let velocity = config
            .terms
            .iter()
            .fold(Vec3::ZERO, |acc, term| {
                acc + (term.direction.normalize_or_zero() * term.speed).extend(0.0)
            })
            * UU_TO_M;

        Ok(Self {
            config,
            terms,
            velocity,
        })
    }

    /// Flat water at `base_z` covering the default domain around `origin`.
    pub fn still(origin: Vec2, base_z: f32) -> Self {
        Self {
            config: WaveConfig::new(origin, base_z),
            terms: Vec::new(),
            velocity: Vec3::ZERO,
        }
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Whether `xy` lies inside the simulated square.
    #[inline]
    pub fn contains(&self, xy: Vec2) -> bool {
        let local = xy - self.config.origin;
        let size = self.config.grid_world_size;
        (0.0..=size).contains(&local.x) && (0.0..=size).contains(&local.y)
    }

    /// Sample the water height at a world XY.
    #[inline]
    pub fn sample_height(&self, xy: Vec2, time: f32) -> WaterSample {
        if !self.contains(xy) {
            return WaterSample::INVALID;
        }
        let local = xy - self.config.origin;

        let height = self.terms.iter().fold(self.config.base_z, |z, term| {
            z + term.amplitude * term.phase(local, time).sin()
        });

        WaterSample {
            position: xy.extend(height),
            normal: Vec3::Z,
            valid: true,
        }
    }

    /// Batch sample multiple points.
    pub fn sample_batch(&self, points: &[Vec2], time: f32, out: &mut [WaterSample]) {
        debug_assert_eq!(points.len(), out.len());

        for (sample, &xy) in out.iter_mut().zip(points) {
            *sample = self.sample_height(xy, time);
        }
    }

    /// Bulk water velocity in m/s. Constant for the run.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Normal of the displaced Gerstner surface above `xy`.
    ///
    /// Falls back to +Z outside the domain or when the tangents degenerate.
    pub fn surface_normal(&self, xy: Vec2, time: f32) -> Vec3 {
        if !self.contains(xy) {
            return Vec3::Z;
        }
        let local = xy - self.config.origin;

        let mut tangent_x = Vec3::X;
        let mut tangent_y = Vec3::Y;

        for term in &self.terms {
            let (sin_phase, cos_phase) = term.phase(local, time).sin_cos();
            let d = term.direction;
            let qak = term.q * term.amplitude * term.k;
            let ak = term.amplitude * term.k;

            tangent_x += Vec3::new(
                -qak * d.x * d.x * sin_phase,
                -qak * d.x * d.y * sin_phase,
                ak * d.x * cos_phase,
            );
            tangent_y += Vec3::new(
                -qak * d.x * d.y * sin_phase,
                -qak * d.y * d.y * sin_phase,
                ak * d.y * cos_phase,
            );
        }

        tangent_x.cross(tangent_y).normalize_or(Vec3::Z)
    }

    /// Where the surface point that rests above `xy` is carried by the waves.
    pub fn displaced_position(&self, xy: Vec2, time: f32) -> Vec3 {
        let local = xy - self.config.origin;
        let mut position = xy.extend(self.config.base_z);

        for term in &self.terms {
            let (sin_phase, cos_phase) = term.phase(local, time).sin_cos();
            let horizontal = term.direction * (term.q * term.amplitude * cos_phase);
            position += horizontal.extend(term.amplitude * sin_phase);
        }

        position
    }
}
