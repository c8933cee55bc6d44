use super::chain::{Chain, EndEffector};
use super::config::SolverConfig;
use super::passes::{break_two_cycle, damp, root_pass, straight_line, tension_pass, tip_pass};
use super::rotation::apply_rotations;
use crate::dynamics::ExponentialSmoothing;
use crate::math::{flatten, planar_distance};
use crate::scene::{NodeId, Scene};
use glam::{Mat4, Vec3};

/// World-space targets for one solve call. Missing ends default to the
/// chain's current tip and root.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorTargets {
    pub tip: Option<Vec3>,
    pub root: Option<Vec3>,
    /// Point the tension pass pulls toward, defaults to the tip anchor.
    pub pull: Option<Vec3>,
}

impl AnchorTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn both(tip: Vec3, root: Vec3) -> Self {
        Self {
            tip: Some(tip),
            root: Some(root),
            pull: None,
        }
    }

    pub fn with_tip(mut self, tip: Vec3) -> Self {
        self.tip = Some(tip);
        self
    }

    pub fn with_root(mut self, root: Vec3) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_pull(mut self, pull: Vec3) -> Self {
        self.pull = Some(pull);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Fewer than two bones, nothing was done.
    Skipped,
    Reachable,
    /// Anchors farther apart than the chain is long.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub mode: SolveMode,
    pub iterations: u32,
    pub tip_error: f32,
    pub root_error: f32,
    pub converged: bool,
    pub cycles_broken: u32,
    /// Rotation applied per segment this call, in degrees.
    pub rotations_deg: Vec<f32>,
    pub effector: EndEffector,
}

impl SolveResult {
    fn skipped(effector: EndEffector) -> Self {
        Self {
            mode: SolveMode::Skipped,
            iterations: 0,
            tip_error: 0.0,
            root_error: 0.0,
            converged: true,
            cycles_broken: 0,
            rotations_deg: Vec::new(),
            effector,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpaceKey {
    reference: Option<NodeId>,
    bone_count: usize,
}

#[derive(Debug, Clone)]
struct SolverState {
    key: SpaceKey,
    positions: Vec<Vec3>,
    previous: Vec<Vec3>,
    before_previous: Vec<Vec3>,
    lengths: Vec<f32>,
    total_length: f32,
    tip_anchor: ExponentialSmoothing<Vec3>,
    root_anchor: ExponentialSmoothing<Vec3>,
    last_mode: Option<SolveMode>,
}

impl SolverState {
    fn new(key: SpaceKey, smoothing: f32) -> Self {
        let n = key.bone_count;
        Self {
            key,
            positions: vec![Vec3::ZERO; n],
            previous: vec![Vec3::ZERO; n],
            before_previous: vec![Vec3::ZERO; n],
            lengths: Vec::with_capacity(n.saturating_sub(1)),
            total_length: 0.0,
            tip_anchor: ExponentialSmoothing::new(smoothing),
            root_anchor: ExponentialSmoothing::new(smoothing),
            last_mode: None,
        }
    }

    fn end_errors(&self, tip: Vec3, root: Vec3) -> (f32, f32) {
        let n = self.positions.len();
        (
            self.positions[n - 1].distance(tip),
            self.positions[0].distance(root),
        )
    }

    /// Bounded two-ended relaxation. Returns iterations run and how many
    /// times the two-cycle breaker fired.
    fn relax(&mut self, config: &SolverConfig, tip: Vec3, root: Vec3, pull: Vec3) -> (u32, u32) {
        self.previous.clone_from(&self.positions);
        self.before_previous.clone_from(&self.positions);

        let (mut tip_error, mut root_error) = self.end_errors(tip, root);
        let mut iterations = 0;
        let mut cycles = 0;

        for iteration in 0..config.iterations {
            iterations = iteration + 1;

            if config.tip_first(iteration, tip_error, root_error) {
                tip_pass(&mut self.positions, &self.lengths, tip, config.relaxation);
                root_pass(&mut self.positions, &self.lengths, root, config.relaxation);
            } else {
                root_pass(&mut self.positions, &self.lengths, root, config.relaxation);
                tip_pass(&mut self.positions, &self.lengths, tip, config.relaxation);
            }

            if config.pull_strength > 0.0 {
                for _ in 0..config.pull_passes {
                    tension_pass(
                        &mut self.positions,
                        root,
                        pull,
                        config.pull_strength,
                        config.pull_bias,
                    );
                }
            }

            damp(&mut self.positions, &self.previous, config.global_damping);

            if config.break_two_cycle
                && break_two_cycle(
                    &mut self.positions,
                    &self.previous,
                    &self.before_previous,
                    config.two_cycle_eps2,
                    config.two_cycle_mix,
                )
            {
                cycles += 1;
            }

            std::mem::swap(&mut self.before_previous, &mut self.previous);
            self.previous.clone_from(&self.positions);

            (tip_error, root_error) = self.end_errors(tip, root);
            if tip_error <= config.tolerance && root_error <= config.tolerance {
                break;
            }
        }

        (iterations, cycles)
    }
}

/// Planar solver that pulls a chain's tip and root toward two independent
/// anchors every tick, then rotates the scene nodes to follow.
///
/// The solver keeps working buffers and smoothed anchors between calls, so
/// one instance should drive one chain.
#[derive(Debug, Clone, Default)]
pub struct DualAnchorSolver {
    config: SolverConfig,
    state: Option<SolverState>,
}

impl DualAnchorSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config: config.sanitized(),
            state: None,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config.sanitized();
    }

    /// Drops all temporal state; the next call starts fresh.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Solved points from the last call, in solve space.
    pub fn solved_positions(&self) -> &[Vec3] {
        match &self.state {
            Some(state) => &state.positions,
            None => &[],
        }
    }

    /// Smoothed `(tip, root)` anchors used by the last call, in solve space.
    pub fn smoothed_anchors(&self) -> Option<(Vec3, Vec3)> {
        let state = self.state.as_ref()?;
        Some((state.tip_anchor.current()?, state.root_anchor.current()?))
    }

    pub fn solve(&mut self, chain: &mut Chain, scene: &mut Scene, targets: &AnchorTargets) -> EndEffector {
        self.solve_detailed(chain, scene, targets).effector
    }

    pub fn solve_detailed(
        &mut self,
        chain: &mut Chain,
        scene: &mut Scene,
        targets: &AnchorTargets,
    ) -> SolveResult {
        let n = chain.bone_count();
        if n < 2 {
            return SolveResult::skipped(*chain.end_effector());
        }
        let config = self.config;

        let reference = config.solve_space_override.or_else(|| {
            chain
                .root_node()
                .and_then(|root| scene.parent(root).ok().flatten())
        });
        let space = reference
            .and_then(|r| scene.world_matrix(r).ok())
            .unwrap_or(Mat4::IDENTITY);
        let to_space = space.inverse();

        let key = SpaceKey {
            reference,
            bone_count: n,
        };
        if self.state.as_ref().map_or(true, |s| s.key != key) {
            log::debug!("solver state reset: reference {reference:?}, {n} bones");
            self.state = Some(SolverState::new(key, config.target_smoothing));
        }
        let state = self
            .state
            .get_or_insert_with(|| SolverState::new(key, config.target_smoothing));

        state.lengths.clear();
        state.lengths.extend(chain.segment_lengths());
        state.total_length = chain.total_length();

        for (i, bone) in chain.bones().iter().enumerate() {
            if let Some(world) = bone.attachment.and_then(|node| scene.world_position(node).ok()) {
                state.positions[i] = to_space.transform_point3(world);
            }
        }

        let plane_z = state.positions[0].z;
        if config.planar {
            for p in &mut state.positions {
                *p = flatten(*p, plane_z);
            }
        }
        let into_space = |p: Vec3| {
            let local = to_space.transform_point3(p);
            if config.planar {
                flatten(local, plane_z)
            } else {
                local
            }
        };

        let raw_tip = targets.tip.map(into_space).unwrap_or(state.positions[n - 1]);
        let raw_root = targets.root.map(into_space).unwrap_or(state.positions[0]);
        state.tip_anchor.set_smoothing(config.target_smoothing);
        state.root_anchor.set_smoothing(config.target_smoothing);
        let tip = state.tip_anchor.update(raw_tip);
        let root = state.root_anchor.update(raw_root);
        let pull = targets.pull.map(into_space).unwrap_or(tip);

        // Reachability is judged in the plane even when relaxation runs in 3D.
        let (mode, iterations, cycles_broken) = if planar_distance(tip, root) > state.total_length {
            straight_line(&mut state.positions, &state.lengths, root, tip);
            (SolveMode::Unreachable, 0, 0)
        } else {
            let (iterations, cycles) = state.relax(&config, tip, root, pull);
            (SolveMode::Reachable, iterations, cycles)
        };

        if config.pin_root && targets.root.is_some() {
            let pinned = &mut state.positions[0];
            pinned.x = root.x;
            pinned.y = root.y;
        }

        if let Some(last) = state.last_mode.filter(|&last| last != mode) {
            log::debug!("reachability changed: {last:?} -> {mode:?}");
        }
        state.last_mode = Some(mode);

        let (tip_error, root_error) = state.end_errors(tip, root);
        let rotations_deg = apply_rotations(chain, scene, &state.positions, &space, &config);

        let effector = match chain
            .tip_node()
            .and_then(|node| scene.world_transform(node).ok().map(|w| (node, w)))
        {
            Some((node, world)) => EndEffector {
                id: Some(node),
                location: world.position,
                orientation: world.rotation,
            },
            None => EndEffector {
                location: space.transform_point3(state.positions[n - 1]),
                ..*chain.end_effector()
            },
        };
        chain.set_end_effector(effector);

        log::trace!(
            "solve {mode:?}: {iterations} iterations, tip error {tip_error:.5}, root error {root_error:.5}"
        );

        SolveResult {
            mode,
            iterations,
            tip_error,
            root_error,
            converged: tip_error <= config.tolerance && root_error <= config.tolerance,
            cycles_broken,
            rotations_deg,
            effector,
        }
    }
}
