//! Procedural water surface shared by every force provider.
//!
//! ## Architecture
//!
//! ```text
//!   WaveConfig (serde, loaded once)
//!        │
//!        ▼
//!   WaveField ── sample_height ──► WaterSample   (per triangle, per step)
//!        │    ── velocity ───────► Vec3 m/s      (constant for the run)
//!        │    ── surface_normal / displaced_position (mesh animation)
//! ```

pub mod config;
pub mod field;

pub use config::{WaveConfig, WavePreset, WaveTerm};
pub use field::{WaterSample, WaveField};
