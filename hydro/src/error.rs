//! Error types for the hydrodynamics core.
//!
//! Construction-time validation and aggregate-level step failures return
//! `HydroResult<T>`. Per-triangle problems never surface here: they are
//! skipped locally and the step carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HydroError {
    /// Hull vertex/index buffers are malformed.
    #[error("Invalid hull mesh: {0}")]
    InvalidMesh(String),

    /// A wave term is out of its valid range.
    #[error("Invalid wave term: {0}")]
    InvalidWave(String),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The hull produced no triangles for this step.
    #[error("{}", crate::constants::EMPTY_HULL_ERROR)]
    EmptyHull,

    /// The pose provider handed over a non-finite transform or velocity.
    #[error("{}", crate::constants::NON_FINITE_POSE_ERROR)]
    NonFiniteKinematics,
}

pub type HydroResult<T> = Result<T, HydroError>;
