//! # limb-ik
//!
//! Planar inverse kinematics for articulated limbs whose tip and root both
//! chase moving targets, such as a paddle arm reaching for a ball.
//!
//! ## Features
//! - Chain building from a node hierarchy (bones only, or alternating
//!   bone/joint nodes) with cached segment lengths and structured warnings
//! - Dual-anchor FABRIK-style relaxation with damping, tension and a
//!   two-cycle breaker
//! - Clamped per-tick rotations written back to the scene, optionally
//!   through separate pivot nodes
//!
//! ## Example
//! ```rust,ignore
//! use limb_ik::ik::{AnchorTargets, Chain, DualAnchorSolver, SolverConfig};
//! use limb_ik::{Scene, Transform};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let shoulder = scene.add_root("shoulder", Transform::IDENTITY);
//! let elbow = scene.add_child(shoulder, "elbow", Transform::from_position(Vec3::Y))?;
//! let hand = scene.add_child(elbow, "hand", Transform::from_position(Vec3::Y))?;
//!
//! let mut chain = Chain::builder(shoulder).end_effector(hand).build(&scene)?.chain;
//! let mut solver = DualAnchorSolver::new(SolverConfig::default());
//!
//! // Once per tick, after the rest of the scene has moved
//! let targets = AnchorTargets::both(Vec3::new(1.2, 0.8, 0.0), Vec3::ZERO);
//! let effector = solver.solve(&mut chain, &mut scene, &targets);
//! println!("hand at {:?}", effector.location);
//! ```

pub mod dynamics;
pub mod ik;
pub mod math;
pub mod scene;

pub use dynamics::{ExponentialSmoothing, Interpolatable};
pub use ik::{
    AnchorTargets, Bone, BuildError, BuildMode, Chain, ChainBuilder, ChainWarning, DualAnchorSolver,
    EndEffector, Joint, SolveMode, SolveResult, SolverConfig,
};
pub use math::Transform;
pub use scene::{NodeId, Scene, SceneError};
