use bevy::math::{Quat, Vec2, Vec3};
use bevy::transform::components::Transform;
use bevy_log::info;
use hydro::{HelmConfig, HullMesh, HydroConfig, HydroError, HydroResult, WaveConfig, WavePreset};
use ron::de::from_str;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Side length of the simulated ocean around a preset (cm).
const PRESET_DOMAIN_SIZE: f32 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaveSpec {
    /// Preset sea state on a square domain centred on the world origin
    Preset { preset: WavePreset, base_z: f32 },
    Custom(WaveConfig),
}

impl WaveSpec {
    pub fn to_config(&self) -> WaveConfig {
        match self {
            WaveSpec::Preset { preset, base_z } => preset
                .to_config(Vec2::splat(-PRESET_DOMAIN_SIZE / 2.0), *base_z)
                .with_grid_world_size(PRESET_DOMAIN_SIZE),
            WaveSpec::Custom(config) => config.clone(),
        }
    }
}

impl Default for WaveSpec {
    fn default() -> Self {
        WaveSpec::Preset {
            preset: WavePreset::Calm,
            base_z: 0.0,
        }
    }
}

/// Box hull dimensions (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullSpec {
    pub length: f32,
    pub beam: f32,
    pub depth: f32,
    pub subdivisions: u32,
}

impl Default for HullSpec {
    fn default() -> Self {
        Self {
            length: 400.0,
            beam: 200.0,
            depth: 100.0,
            subdivisions: 6,
        }
    }
}

impl HullSpec {
    pub fn build_mesh(&self) -> HydroResult<HullMesh> {
        HullMesh::box_hull(self.length, self.beam, self.depth, self.subdivisions)
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.length, self.beam, self.depth) * 0.5
    }
}

/// Starting state of the rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySpec {
    /// kg
    pub mass: f32,
    pub position: Vec3,
    /// Heading about +Z
    pub yaw_degrees: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for BodySpec {
    fn default() -> Self {
        Self {
            mass: 2000.0,
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl BodySpec {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position)
            .with_rotation(Quat::from_rotation_z(self.yaw_degrees.to_radians()))
    }
}

/// Constant helm inputs for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmSpec {
    pub config: HelmConfig,
    /// [-1, 1]
    pub throttle: f32,
    /// [-1, 1]
    pub steering: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub wave: WaveSpec,
    pub hull: HullSpec,
    pub body: BodySpec,
    pub hydro: HydroConfig,
    pub helm: HelmSpec,
    pub steps: u32,
    /// Fixed step (s)
    pub dt: f32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "calm-drift".to_string(),
            wave: WaveSpec::default(),
            hull: HullSpec::default(),
            body: BodySpec::default(),
            hydro: HydroConfig::default(),
            helm: HelmSpec::default(),
            steps: 600,
            dt: 1.0 / 60.0,
        }
    }
}

impl Scenario {
    pub fn validate(&self) -> HydroResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(HydroError::InvalidConfig(format!(
                "step must be positive, got {}",
                self.dt
            )));
        }
        if !(self.body.mass.is_finite() && self.body.mass > 0.0) {
            return Err(HydroError::InvalidConfig(format!(
                "hull mass must be positive, got {}",
                self.body.mass
            )));
        }
        if !(-1.0..=1.0).contains(&self.helm.throttle) || !(-1.0..=1.0).contains(&self.helm.steering) {
            return Err(HydroError::InvalidConfig(
                "helm inputs must lie in [-1, 1]".into(),
            ));
        }
        self.hydro.validate()
    }
}

pub fn parse_scenario(contents: &str) -> Result<Scenario, Box<dyn std::error::Error>> {
    let scenario: Scenario = from_str(contents)?;
    scenario.validate()?;
    Ok(scenario)
}

/// Load a scenario from a `.ron` file, or the built-in default without one.
pub fn load_scenario(path: Option<&Path>) -> Result<Scenario, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        info!("No scenario file given, using the default scenario");
        return Ok(Scenario::default());
    };

    let contents: String = fs::read_to_string(path)?;
    let scenario = parse_scenario(&contents)?;

    info!("Loaded scenario '{}' from {}", scenario.name, path.display());

    Ok(scenario)
}
