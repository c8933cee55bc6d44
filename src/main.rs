use glam::Vec3;
use limb_ik::ik::{AnchorTargets, Chain, DualAnchorSolver, SolveMode, SolverConfig};
use limb_ik::{NodeId, Scene, Transform};
use std::error::Error;

const TICK_DT: f32 = 1.0 / 60.0;
const DEFAULT_TICKS: u32 = 240;
const REPORT_EVERY: u32 = 30;

struct Rig {
    scene: Scene,
    paddle: NodeId,
    shoulder: NodeId,
    chain: Chain,
}

impl Rig {
    fn new() -> Result<Self, Box<dyn Error>> {
        let mut scene = Scene::new();
        let paddle = scene.add_root("paddle", Transform::from_position(Vec3::new(0.0, -4.0, 0.0)));
        let shoulder = scene.add_child(paddle, "shoulder", Transform::from_position(Vec3::new(0.0, 0.5, 0.0)))?;
        let elbow = scene.add_child(shoulder, "elbow", Transform::from_position(Vec3::new(0.0, 1.2, 0.0)))?;
        let wrist = scene.add_child(elbow, "wrist", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))?;
        let hand = scene.add_child(wrist, "hand", Transform::from_position(Vec3::new(0.0, 0.4, 0.0)))?;

        let build = Chain::builder(shoulder).end_effector(hand).build(&scene)?;
        log::info!(
            "built chain: {} bones, total length {:.2}, {} warnings",
            build.chain.bone_count(),
            build.chain.total_length(),
            build.warnings.len()
        );

        Ok(Self {
            scene,
            paddle,
            shoulder,
            chain: build.chain,
        })
    }

    fn move_paddle(&mut self, t: f32) -> Result<(), Box<dyn Error>> {
        let mut local = self.scene.local(self.paddle)?;
        local.position.x = 2.5 * (t * 0.7).sin();
        self.scene.set_local(self.paddle, local)?;
        Ok(())
    }
}

fn ball_position(t: f32) -> Vec3 {
    Vec3::new(3.0 * (t * 1.3).cos(), -1.0 + 1.5 * (t * 2.1).sin(), 0.0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let ticks = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut rig = Rig::new()?;
    let mut solver = DualAnchorSolver::new(
        SolverConfig::default()
            .with_target_smoothing(0.3)
            .with_pull(0.1, 0.5, 1)
            .with_global_damping(0.1),
    );

    let mut unreachable_ticks = 0;
    for tick in 0..ticks {
        let t = tick as f32 * TICK_DT;
        rig.move_paddle(t)?;

        let ball = ball_position(t);
        let shoulder = rig.scene.world_position(rig.shoulder)?;
        let targets = AnchorTargets::both(ball, shoulder);

        let result = solver.solve_detailed(&mut rig.chain, &mut rig.scene, &targets);
        if result.mode == SolveMode::Unreachable {
            unreachable_ticks += 1;
        }

        if tick % REPORT_EVERY == 0 {
            log::info!(
                "tick {tick:>4}: {:?} after {} iterations, hand {:.2?} -> ball {:.2?} ({:.3} away)",
                result.mode,
                result.iterations,
                result.effector.location,
                ball,
                result.effector.location.distance(ball),
            );
        }
    }

    log::info!("{unreachable_ticks} of {ticks} ticks had the ball out of reach");
    Ok(())
}
