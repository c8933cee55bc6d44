//! Math utilities module
//!
//! Provides convenient re-exports from glam, the transform type and the
//! planar helpers used by the solver.

pub mod planar;
mod transform;

pub use planar::{facing_rotation, flatten, planar_distance, safe_normalize, signed_angle_z};
pub use transform::Transform;

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3};
