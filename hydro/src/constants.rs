use bevy::math::Vec3;

/// Host length unit (centimetre) to metres.
pub const UU_TO_M: f32 = 0.01;
/// Metres to host length unit; also newtons to host force unit (centinewtons).
pub const M_TO_UU: f32 = 100.0;

/// Seawater density (kg/m³).
pub const SEAWATER_DENSITY: f32 = 1025.0;
/// Seawater dynamic viscosity (Pa·s).
pub const SEAWATER_DYNAMIC_VISCOSITY: f32 = 0.00108;
/// ITTC-57 skin friction numerator.
pub const SKIN_FRICTION_COEFFICIENT: f32 = 0.075;

/// Default world gravity along Z, in host units (cm/s²).
pub const DEFAULT_GRAVITY_Z: f32 = -980.0;

/// World up axis. The whole crate is Z-up.
pub const UP: Vec3 = Vec3::Z;

/// Divisor guard for Reynolds numbers, speeds and normalisation.
pub const SMALL_NUMBER: f32 = 1.0e-4;

/// Triangle count thresholds at which the aggregator doubles and triples
/// its batch count relative to the number of cores.
pub const MEDIUM_HULL_TRIANGLES: usize = 5000;
pub const LARGE_HULL_TRIANGLES: usize = 8000;

pub const EMPTY_HULL_ERROR: &str = "Hull has no triangles to aggregate";
pub const NON_FINITE_POSE_ERROR: &str = "Hull pose contains NaN or infinite values";
