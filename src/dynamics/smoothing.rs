use glam::Vec3;

pub trait Interpolatable: Clone + Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolatable for Vec3 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

pub const MAX_SMOOTHING: f32 = 0.95;

/// First-order exponential filter.
///
/// Each update moves the held value a fraction `1 - smoothing` of the way
/// toward the raw sample, so a held step input is approached geometrically
/// without overshoot. The first sample is taken as-is.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSmoothing<T: Interpolatable> {
    value: Option<T>,
    smoothing: f32,
}

impl<T: Interpolatable> ExponentialSmoothing<T> {
    pub fn new(smoothing: f32) -> Self {
        Self {
            value: None,
            smoothing: smoothing.clamp(0.0, MAX_SMOOTHING),
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, MAX_SMOOTHING);
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn reset(&mut self) {
        self.value = None;
    }

    pub fn update(&mut self, raw: T) -> T {
        let next = match self.value {
            Some(prev) => prev.lerp_to(raw, 1.0 - self.smoothing),
            None => raw,
        };
        self.value = Some(next);
        next
    }

    pub fn current(&self) -> Option<T> {
        self.value
    }
}
