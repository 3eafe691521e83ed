//! Hydrodynamics configuration.
//!
//! Everything is loaded once per run. Missing fields fall back to the
//! defaults below, so scenario files only list what they change.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRAVITY_Z, SEAWATER_DENSITY};
use crate::error::{HydroError, HydroResult};
use crate::hull::ForwardAxis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    /// World gravity along Z (cm/s²)
    pub gravity_z: f32,
    /// Fluid density (kg/m³)
    pub fluid_density: f32,
    /// Enable the buoyancy provider
    pub buoyancy: bool,
    pub viscous: Option<ViscousDragConfig>,
    pub pressure: Option<PressureDragConfig>,
    pub aggregator: AggregatorConfig,
    pub forward_axis: ForwardAxis,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            gravity_z: DEFAULT_GRAVITY_Z,
            fluid_density: SEAWATER_DENSITY,
            buoyancy: true,
            viscous: Some(ViscousDragConfig::default()),
            pressure: Some(PressureDragConfig::default()),
            aggregator: AggregatorConfig::default(),
            forward_axis: ForwardAxis::default(),
        }
    }
}

impl HydroConfig {
    /// Buoyancy only, no drag.
    pub fn buoyancy_only() -> Self {
        Self {
            viscous: None,
            pressure: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> HydroResult<()> {
        if !self.gravity_z.is_finite() {
            return Err(HydroError::InvalidConfig("gravity must be finite".into()));
        }
        if !(self.fluid_density.is_finite() && self.fluid_density > 0.0) {
            return Err(HydroError::InvalidConfig(format!(
                "fluid density must be positive, got {}",
                self.fluid_density
            )));
        }
        if let Some(viscous) = &self.viscous {
            viscous.validate()?;
        }
        if let Some(pressure) = &self.pressure {
            pressure.validate()?;
        }
        self.aggregator.validate()
    }
}

/// Skin friction drag settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViscousDragConfig {
    /// Hull form factor (1 + k)
    pub k_factor: f32,
    /// Relative speed (m/s) used to fix the Reynolds number at startup.
    /// `None` uses the hull's relative speed when the simulation initialises.
    pub calibration_speed: Option<f32>,
    /// Replace `k_factor` with an area-weighted value computed from the
    /// submerged hull at startup
    pub integrated_k: Option<IntegratedKConfig>,
}

impl Default for ViscousDragConfig {
    fn default() -> Self {
        Self {
            k_factor: 1.4,
            calibration_speed: None,
            integrated_k: None,
        }
    }
}

impl ViscousDragConfig {
    fn validate(&self) -> HydroResult<()> {
        if !self.k_factor.is_finite() {
            return Err(HydroError::InvalidConfig("viscous k factor must be finite".into()));
        }
        if let Some(speed) = self.calibration_speed {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(HydroError::InvalidConfig(format!(
                    "calibration speed must be non-negative, got {speed}"
                )));
            }
        }
        if let Some(integrated) = &self.integrated_k {
            if !(integrated.forward_k.is_finite() && integrated.back_k.is_finite()) {
                return Err(HydroError::InvalidConfig("integrated k values must be finite".into()));
            }
        }
        Ok(())
    }
}

/// Form factors for polygons ahead of and behind the hull centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratedKConfig {
    pub forward_k: f32,
    pub back_k: f32,
}

impl Default for IntegratedKConfig {
    fn default() -> Self {
        Self {
            forward_k: -0.5,
            back_k: 1.0,
        }
    }
}

/// Pressure and suction drag coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureDragConfig {
    pub cpd1: f32,
    pub cpd2: f32,
    pub csd1: f32,
    pub csd2: f32,
    /// Pressure falloff exponent
    pub fp: f32,
    /// Suction falloff exponent
    pub fs: f32,
    /// Speed (m/s) the drag terms are normalised against. Non-positive
    /// disables the provider.
    pub reference_speed: f32,
}

impl Default for PressureDragConfig {
    fn default() -> Self {
        Self {
            cpd1: 0.2,
            cpd2: 1.0,
            csd1: 0.1,
            csd2: 0.5,
            fp: 0.5,
            fs: 0.5,
            reference_speed: 1.0,
        }
    }
}

impl PressureDragConfig {
    fn validate(&self) -> HydroResult<()> {
        let values = [
            self.cpd1,
            self.cpd2,
            self.csd1,
            self.csd2,
            self.fp,
            self.fs,
            self.reference_speed,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(HydroError::InvalidConfig(
                "pressure drag coefficients must be finite".into(),
            ));
        }
        if self.fp < 0.0 || self.fs < 0.0 {
            return Err(HydroError::InvalidConfig(format!(
                "pressure drag falloff exponents must be non-negative, got fp = {}, fs = {}",
                self.fp, self.fs
            )));
        }
        if self.reference_speed <= 0.0 {
            warn!(
                "Pressure drag reference speed is {}, pressure drag is disabled",
                self.reference_speed
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Fixed triangles per batch. `None` scales the batch count with the
    /// available cores and the hull size.
    pub batch_size: Option<usize>,
}

impl AggregatorConfig {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size: Some(batch_size),
        }
    }

    fn validate(&self) -> HydroResult<()> {
        match self.batch_size {
            Some(0) => Err(HydroError::InvalidConfig("batch size must be at least 1".into())),
            _ => Ok(()),
        }
    }
}

/// Throttle and rudder strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmConfig {
    /// Forward acceleration at full throttle (cm/s²)
    pub acceleration: f32,
    /// Lateral rudder force, applied at the rudder reference
    pub turn_torque: f32,
    /// Throttle cuts out at this speed (m/s)
    pub max_speed: f32,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            acceleration: 1000.0,
            turn_torque: 1000.0,
            max_speed: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(HydroConfig::default().validate().is_ok());
        assert!(HydroConfig::buoyancy_only().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_density() {
        let config = HydroConfig {
            fluid_density: 0.0,
            ..HydroConfig::default()
        };
        assert!(matches!(config.validate(), Err(HydroError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_falloff_exponents() {
        for (fp, fs) in [(-0.5, 0.5), (0.5, -1.0)] {
            let config = HydroConfig {
                pressure: Some(PressureDragConfig {
                    fp,
                    fs,
                    ..PressureDragConfig::default()
                }),
                ..HydroConfig::default()
            };
            assert!(matches!(config.validate(), Err(HydroError::InvalidConfig(_))));
        }

        let flat = HydroConfig {
            pressure: Some(PressureDragConfig {
                fp: 0.0,
                fs: 0.0,
                ..PressureDragConfig::default()
            }),
            ..HydroConfig::default()
        };
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_batch_size() {
        let config = HydroConfig {
            aggregator: AggregatorConfig::with_batch_size(0),
            ..HydroConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_reference_speed_is_accepted() {
        let config = HydroConfig {
            pressure: Some(PressureDragConfig {
                reference_speed: 0.0,
                ..PressureDragConfig::default()
            }),
            ..HydroConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_calibration_speed() {
        let config = HydroConfig {
            viscous: Some(ViscousDragConfig {
                calibration_speed: Some(-1.0),
                ..ViscousDragConfig::default()
            }),
            ..HydroConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
