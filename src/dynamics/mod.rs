//! Temporal filtering for values that move between solver ticks.

mod smoothing;

pub use smoothing::{ExponentialSmoothing, Interpolatable, MAX_SMOOTHING};
