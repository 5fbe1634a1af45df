use bevy_ecs::prelude::*;

/// Red-overlay alpha for `count` open popups.
///
/// `min(1, count / threshold) * max_alpha`; a non-positive threshold yields 0.
pub fn intensity_alpha(count: usize, threshold: i32, max_alpha: f32) -> f32 {
    if threshold <= 0 {
        return 0.0;
    }
    let normalized = (count as f32 / threshold as f32).clamp(0.0, 1.0);
    max_alpha * normalized
}

/// Derived threat signal, recomputed after every registry mutation.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct IntensityState {
    pub normalized: f32,
    pub alpha: f32,
}

impl IntensityState {
    pub fn recompute(&mut self, count: usize, threshold: i32, max_alpha: f32) {
        self.normalized = intensity_alpha(count, threshold, 1.0);
        self.alpha = intensity_alpha(count, threshold, max_alpha);
    }
}
