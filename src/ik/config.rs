use crate::dynamics::MAX_SMOOTHING;
use crate::scene::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassOrder {
    TipFirst,
    RootFirst,
    /// Alternate by iteration parity, or by larger end error when
    /// `adaptive_pass_order` is set.
    #[default]
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub iterations: u32,
    pub tolerance: f32,
    pub relaxation: f32,
    pub solve_space_override: Option<NodeId>,
    pub pin_root: bool,
    pub planar: bool,
    pub target_smoothing: f32,
    pub pull_strength: f32,
    pub pull_bias: f32,
    pub pull_passes: u32,
    pub max_delta_z_deg: f32,
    pub unscale_during_rotation: bool,
    pub use_joint_pivots: bool,
    pub global_damping: f32,
    pub adaptive_pass_order: bool,
    pub break_two_cycle: bool,
    pub two_cycle_eps2: f32,
    pub two_cycle_mix: f32,
    pub pass_order_mode: PassOrder,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            tolerance: 1e-3,
            relaxation: 1.0,
            solve_space_override: None,
            pin_root: true,
            planar: true,
            target_smoothing: 0.0,
            pull_strength: 0.0,
            pull_bias: 0.0,
            pull_passes: 1,
            max_delta_z_deg: 30.0,
            unscale_during_rotation: false,
            use_joint_pivots: true,
            global_damping: 0.0,
            adaptive_pass_order: false,
            break_two_cycle: true,
            two_cycle_eps2: 1e-6,
            two_cycle_mix: 0.5,
            pass_order_mode: PassOrder::Alternate,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_relaxation(mut self, relaxation: f32) -> Self {
        self.relaxation = relaxation;
        self
    }

    pub fn with_solve_space(mut self, reference: NodeId) -> Self {
        self.solve_space_override = Some(reference);
        self
    }

    pub fn with_pin_root(mut self, pin: bool) -> Self {
        self.pin_root = pin;
        self
    }

    pub fn with_planar(mut self, planar: bool) -> Self {
        self.planar = planar;
        self
    }

    pub fn with_target_smoothing(mut self, smoothing: f32) -> Self {
        self.target_smoothing = smoothing;
        self
    }

    pub fn with_pull(mut self, strength: f32, bias: f32, passes: u32) -> Self {
        self.pull_strength = strength;
        self.pull_bias = bias;
        self.pull_passes = passes;
        self
    }

    pub fn with_max_delta_z_deg(mut self, degrees: f32) -> Self {
        self.max_delta_z_deg = degrees;
        self
    }

    pub fn with_unscale_during_rotation(mut self, unscale: bool) -> Self {
        self.unscale_during_rotation = unscale;
        self
    }

    pub fn with_joint_pivots(mut self, use_pivots: bool) -> Self {
        self.use_joint_pivots = use_pivots;
        self
    }

    pub fn with_global_damping(mut self, damping: f32) -> Self {
        self.global_damping = damping;
        self
    }

    pub fn with_pass_order(mut self, order: PassOrder, adaptive: bool) -> Self {
        self.pass_order_mode = order;
        self.adaptive_pass_order = adaptive;
        self
    }

    pub fn with_two_cycle_breaker(mut self, enabled: bool, eps2: f32, mix: f32) -> Self {
        self.break_two_cycle = enabled;
        self.two_cycle_eps2 = eps2;
        self.two_cycle_mix = mix;
        self
    }

    /// Copy with every option clamped into its valid range.
    pub fn sanitized(&self) -> Self {
        let relaxation = if self.relaxation.is_finite() && self.relaxation > 0.0 {
            self.relaxation.min(1.0)
        } else {
            1.0
        };
        Self {
            iterations: self.iterations.max(1),
            tolerance: self.tolerance.max(0.0),
            relaxation,
            target_smoothing: self.target_smoothing.clamp(0.0, MAX_SMOOTHING),
            pull_strength: self.pull_strength.clamp(0.0, 1.0),
            pull_bias: self.pull_bias.clamp(-1.0, 1.0),
            pull_passes: self.pull_passes.min(3),
            max_delta_z_deg: self.max_delta_z_deg.clamp(1.0, 60.0),
            global_damping: self.global_damping.clamp(0.0, 1.0),
            two_cycle_eps2: self.two_cycle_eps2.max(0.0),
            two_cycle_mix: self.two_cycle_mix.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Whether the tip pass runs before the root pass on this iteration.
    pub(crate) fn tip_first(&self, iteration: u32, tip_error: f32, root_error: f32) -> bool {
        match self.pass_order_mode {
            PassOrder::TipFirst => true,
            PassOrder::RootFirst => false,
            PassOrder::Alternate if self.adaptive_pass_order => tip_error >= root_error,
            PassOrder::Alternate => iteration % 2 == 0,
        }
    }
}
