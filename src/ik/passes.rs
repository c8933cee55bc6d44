//! Relaxation passes over a chain of points.
//!
//! `points[i]` is the position of bone `i`; `lengths[i]` the rest distance
//! between `points[i]` and `points[i + 1]`. Every function is a no-op on
//! fewer than two points.

use crate::math::safe_normalize;
use glam::Vec3;

/// Pins the last point to `anchor` and walks toward the root, placing each
/// point `lengths[i]` away from its successor along its current direction.
pub fn tip_pass(points: &mut [Vec3], lengths: &[f32], anchor: Vec3, relaxation: f32) {
    let n = points.len();
    if n < 2 {
        return;
    }

    points[n - 1] = anchor;

    for i in (0..n - 1).rev() {
        let next_pos = points[i + 1];
        let curr_pos = points[i];
        let direction = safe_normalize(curr_pos - next_pos, Vec3::NEG_Y);
        let placed = next_pos + direction * lengths[i];
        points[i] = curr_pos.lerp(placed, relaxation);
    }
}

/// Mirror of [`tip_pass`]: pins the first point and walks toward the tip.
pub fn root_pass(points: &mut [Vec3], lengths: &[f32], anchor: Vec3, relaxation: f32) {
    let n = points.len();
    if n < 2 {
        return;
    }

    points[0] = anchor;

    for i in 1..n {
        let prev_pos = points[i - 1];
        let curr_pos = points[i];
        let direction = safe_normalize(curr_pos - prev_pos, Vec3::Y);
        let placed = prev_pos + direction * lengths[i - 1];
        points[i] = curr_pos.lerp(placed, relaxation);
    }
}

/// Lays the chain along the segment from `root` toward `tip` at cumulative
/// rest offsets, then forces the last point onto `tip`. The last segment
/// may end up longer than its rest length.
pub fn straight_line(points: &mut [Vec3], lengths: &[f32], root: Vec3, tip: Vec3) {
    let n = points.len();
    if n < 2 {
        return;
    }

    let direction = safe_normalize(tip - root, Vec3::Y);
    points[0] = root;
    let mut offset = 0.0;
    for i in 1..n {
        offset += lengths[i - 1];
        points[i] = root + direction * offset;
    }
    points[n - 1] = tip;
}

/// Per-joint pull weight. `bias` > 0 favours joints near the tip, < 0
/// joints near the root.
pub fn pull_weight(index: usize, count: usize, bias: f32) -> f32 {
    if count < 2 {
        return 1.0;
    }
    let t = index as f32 / (count - 1) as f32;
    (1.0 + bias * (2.0 * t - 1.0)).max(0.0)
}

/// Pulls interior points toward their projection on the segment from
/// `root` to `target`.
pub fn tension_pass(points: &mut [Vec3], root: Vec3, target: Vec3, strength: f32, bias: f32) {
    let n = points.len();
    if n < 3 || strength <= 0.0 {
        return;
    }

    let axis = target - root;
    let axis_len2 = axis.length_squared();

    for i in 1..n - 1 {
        let p = points[i];
        let projected = if axis_len2 > f32::EPSILON {
            let t = ((p - root).dot(axis) / axis_len2).clamp(0.0, 1.0);
            root + axis * t
        } else {
            root
        };
        let blend = (strength * pull_weight(i, n, bias)).clamp(0.0, 1.0);
        points[i] = p.lerp(projected, blend);
    }
}

/// Blends `points` toward `previous` by `damping`.
pub fn damp(points: &mut [Vec3], previous: &[Vec3], damping: f32) {
    if damping <= 0.0 {
        return;
    }
    for (p, prev) in points.iter_mut().zip(previous) {
        *p = p.lerp(*prev, damping);
    }
}

pub fn pose_distance2(a: &[Vec3], b: &[Vec3]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x.distance_squared(*y)).sum()
}

/// Detects an A↔B oscillation: the pose matches the one from two iterations
/// ago while differing from the previous one by at least `16 * eps2`. When
/// found, mixes the pose toward the previous one by `mix` and returns true.
pub fn break_two_cycle(
    points: &mut [Vec3],
    previous: &[Vec3],
    before_previous: &[Vec3],
    eps2: f32,
    mix: f32,
) -> bool {
    let back_two = pose_distance2(points, before_previous);
    let back_one = pose_distance2(points, previous);
    if back_two < eps2 && back_one >= 16.0 * eps2 {
        for (p, prev) in points.iter_mut().zip(previous) {
            *p = p.lerp(*prev, mix);
        }
        true
    } else {
        false
    }
}
