//! Planar helpers. The solve plane is the XY plane of the solve space and
//! its normal is +Z.

use glam::{Quat, Vec3};

pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Bones point along +Y at rest.
pub const BONE_AXIS: Vec3 = Vec3::Y;

/// Normalises `v`, returning `fallback` when `v` is too short to have a
/// meaningful direction.
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    let len = v.length();
    if len > DIRECTION_EPSILON {
        v / len
    } else {
        fallback
    }
}

pub fn flatten(v: Vec3, z: f32) -> Vec3 {
    Vec3::new(v.x, v.y, z)
}

pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    (a.truncate() - b.truncate()).length()
}

/// Signed angle in radians that rotates `from` onto `to` about +Z, measured
/// on their XY projections. Returns `None` if either projection is
/// degenerate.
pub fn signed_angle_z(from: Vec3, to: Vec3) -> Option<f32> {
    let a = from.truncate();
    let b = to.truncate();
    if a.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON
        || b.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON
    {
        return None;
    }
    Some(a.perp_dot(b).atan2(a.dot(b)))
}

/// Rotation taking the bone axis onto `direction`.
pub fn facing_rotation(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir.length_squared() < 0.5 {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(BONE_AXIS, dir)
}
