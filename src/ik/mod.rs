//! Inverse Kinematics module
//!
//! Chain construction from a scene hierarchy and the dual-anchor planar
//! solver.

pub mod bone;
pub mod builder;
pub mod chain;
pub mod config;
pub mod diagnostics;
pub mod joint;
pub mod passes;
mod path;
mod rotation;
pub mod solver;

pub use bone::Bone;
pub use builder::{BuildMode, BuildOptions, ChainBuild, ChainBuilder, JointPlacement, DEFAULT_BONE_LENGTH};
pub use chain::{Chain, EndEffector};
pub use config::{PassOrder, SolverConfig};
pub use diagnostics::{BuildError, ChainWarning};
pub use joint::{Joint, PivotTarget};
pub use solver::{AnchorTargets, DualAnchorSolver, SolveMode, SolveResult};
