//! Wave field configuration.
//!
//! Wave terms are loaded once when the world starts and stay immutable for the
//! run. Lengths are in host units (cm), speeds in host units per second.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::error::{HydroError, HydroResult};

/// Default side length of the simulated ocean square (cm).
pub const DEFAULT_GRID_WORLD_SIZE: f32 = 100_000.0;

/// Configuration for a single trochoidal wave term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveTerm {
    /// Travel direction (unit vector in the XY plane)
    pub direction: Vec2,
    /// Wavelength in world units
    pub wavelength: f32,
    /// Crest height above the base level in world units
    pub amplitude: f32,
    /// Phase speed in world units per second
    pub speed: f32,
    /// Wave steepness (0.0 = sine wave, 1.0 = sharp crest)
    pub steepness: f32,
}

impl WaveTerm {
    pub fn new(direction: Vec2, wavelength: f32, amplitude: f32, speed: f32, steepness: f32) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            wavelength,
            amplitude,
            speed,
            steepness: steepness.clamp(0.0, 1.0),
        }
    }

    /// Wave number (k = 2π / wavelength)
    #[inline(always)]
    pub fn wave_number(&self) -> f32 {
        2.0 * PI / self.wavelength
    }

    /// Phase rate (speed * k), multiplied by time to get the phase offset.
    #[inline(always)]
    pub fn phase_rate(&self) -> f32 {
        self.speed * self.wave_number()
    }

    fn validate(&self, index: usize) -> HydroResult<()> {
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(HydroError::InvalidWave(format!(
                "term {index}: wavelength must be positive, got {}",
                self.wavelength
            )));
        }
        if !self.amplitude.is_finite() || !self.speed.is_finite() {
            return Err(HydroError::InvalidWave(format!(
                "term {index}: amplitude and speed must be finite"
            )));
        }
        if !self.direction.is_finite() || self.direction.length_squared() <= f32::EPSILON {
            return Err(HydroError::InvalidWave(format!(
                "term {index}: direction must be a non-zero vector"
            )));
        }
        Ok(())
    }
}

impl Default for WaveTerm {
    fn default() -> Self {
        Self::new(Vec2::X, 100.0, 10.0, 1.0, 0.5)
    }
}

/// Complete wave field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub terms: Vec<WaveTerm>,
    /// World XY of the simulated domain's lower corner
    pub origin: Vec2,
    /// Still water level (Z coordinate)
    pub base_z: f32,
    /// Side length of the square simulated domain
    pub grid_world_size: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        WavePreset::default().to_config(Vec2::ZERO, 0.0)
    }
}

impl WaveConfig {
    /// Create a flat config with no wave terms.
    pub fn new(origin: Vec2, base_z: f32) -> Self {
        Self {
            terms: Vec::new(),
            origin,
            base_z,
            grid_world_size: DEFAULT_GRID_WORLD_SIZE,
        }
    }

    pub fn with_term(mut self, term: WaveTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn with_grid_world_size(mut self, size: f32) -> Self {
        self.grid_world_size = size;
        self
    }

    /// Check every term and the domain size. Steepness is clamped rather than
    /// rejected, matching `WaveTerm::new`.
    pub fn validate(&mut self) -> HydroResult<()> {
        if !(self.grid_world_size.is_finite() && self.grid_world_size > 0.0) {
            return Err(HydroError::InvalidWave(format!(
                "grid world size must be positive, got {}",
                self.grid_world_size
            )));
        }
        if !self.origin.is_finite() || !self.base_z.is_finite() {
            return Err(HydroError::InvalidWave(
                "origin and base level must be finite".into(),
            ));
        }
        for (i, term) in self.terms.iter_mut().enumerate() {
            term.validate(i)?;
            term.direction = term.direction.normalize_or_zero();
            term.steepness = term.steepness.clamp(0.0, 1.0);
        }
        Ok(())
    }
}

/// Preset wave configurations for different sea states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum WavePreset {
    /// Completely still water (no waves)
    Still,
    /// Calm water with a single long swell
    Calm,
    /// Lake with gentle waves
    Lake,
    /// Standard ocean waves
    #[default]
    Ocean,
    /// Stormy ocean with large waves
    Storm,
}

impl WavePreset {
    /// Create a WaveConfig from this preset.
    pub fn to_config(self, origin: Vec2, base_z: f32) -> WaveConfig {
        let config = WaveConfig::new(origin, base_z);

        match self {
            WavePreset::Still => config,
            WavePreset::Calm => {
                config.with_term(WaveTerm::new(Vec2::new(1.0, 0.2), 2000.0, 5.0, 150.0, 0.2))
            }
            WavePreset::Lake => config
                .with_term(WaveTerm::new(Vec2::new(1.0, 0.0), 800.0, 8.0, 100.0, 0.3))
                .with_term(WaveTerm::new(Vec2::new(0.3, 1.0), 500.0, 4.0, 120.0, 0.2)),
            WavePreset::Ocean => config
                .with_term(WaveTerm::new(Vec2::new(1.0, 0.3), 1600.0, 30.0, 250.0, 0.6))
                .with_term(WaveTerm::new(Vec2::new(-0.7, 1.0), 1000.0, 18.0, 200.0, 0.5))
                .with_term(WaveTerm::new(Vec2::new(0.5, -1.0), 600.0, 10.0, 160.0, 0.4))
                .with_term(WaveTerm::new(Vec2::new(-1.0, -0.5), 300.0, 4.0, 110.0, 0.3)),
            WavePreset::Storm => config
                .with_term(WaveTerm::new(Vec2::new(1.0, 0.2), 4000.0, 120.0, 600.0, 0.8))
                .with_term(WaveTerm::new(Vec2::new(-0.5, 1.0), 2500.0, 70.0, 450.0, 0.7))
                .with_term(WaveTerm::new(Vec2::new(0.7, -0.7), 1500.0, 40.0, 350.0, 0.6))
                .with_term(WaveTerm::new(Vec2::new(-1.0, -0.3), 800.0, 20.0, 250.0, 0.5)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_term_counts() {
        assert_eq!(WavePreset::Still.to_config(Vec2::ZERO, 0.0).terms.len(), 0);
        assert_eq!(WavePreset::Calm.to_config(Vec2::ZERO, 0.0).terms.len(), 1);
        assert_eq!(WavePreset::Lake.to_config(Vec2::ZERO, 0.0).terms.len(), 2);
        assert_eq!(WavePreset::Ocean.to_config(Vec2::ZERO, 0.0).terms.len(), 4);
        assert_eq!(WavePreset::Storm.to_config(Vec2::ZERO, 0.0).terms.len(), 4);
    }

    #[test]
    fn test_new_term_normalizes_and_clamps() {
        let term = WaveTerm::new(Vec2::new(3.0, 4.0), 100.0, 1.0, 1.0, 1.7);
        assert!((term.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(term.steepness, 1.0);
    }

    #[test]
    fn test_validate_rejects_non_positive_wavelength() {
        let mut config = WaveConfig::new(Vec2::ZERO, 0.0).with_term(WaveTerm {
            wavelength: 0.0,
            ..WaveTerm::default()
        });
        assert!(matches!(config.validate(), Err(HydroError::InvalidWave(_))));
    }

    #[test]
    fn test_validate_clamps_deserialized_steepness() {
        let mut config = WaveConfig::new(Vec2::ZERO, 0.0).with_term(WaveTerm {
            steepness: -2.0,
            direction: Vec2::new(0.0, 2.0),
            ..WaveTerm::default()
        });
        config.validate().unwrap();
        assert_eq!(config.terms[0].steepness, 0.0);
        assert_eq!(config.terms[0].direction, Vec2::Y);
    }

    #[test]
    fn test_validate_rejects_empty_domain() {
        let mut config = WaveConfig::new(Vec2::ZERO, 0.0).with_grid_world_size(0.0);
        assert!(config.validate().is_err());
    }
}
