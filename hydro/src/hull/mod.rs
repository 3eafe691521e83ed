//! Hull geometry: local buffers, world triangles, clipping and the
//! per-step kinematic snapshot.

pub mod clip;
pub mod geometry;
pub mod kinematics;
pub mod mesh;

pub use clip::{clip_triangle, SubmergedPolygon};
pub use geometry::{ForwardAxis, HullGeometry, Triangle};
pub use kinematics::{KinematicState, MeshPoseProvider};
pub use mesh::HullMesh;
