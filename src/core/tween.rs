//! Timed linear tweening.

use bevy::time::{Timer, TimerMode};
use std::time::Duration;

/// Values that can be linearly interpolated.
pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for bevy::math::Vec2 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

/// Interpolates from `from` to `to` over a fixed duration.
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub timer: Timer,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32) -> Self {
        Self {
            from,
            to,
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
        }
    }

    /// Progress in `[0, 1]`. A zero-length tween is complete immediately.
    pub fn progress(&self) -> f32 {
        self.timer.fraction()
    }

    /// Advance by `delta` and return the new value.
    pub fn tick(&mut self, delta: Duration) -> T {
        self.timer.tick(delta);
        self.value()
    }

    pub fn value(&self) -> T {
        self.from.lerp_to(self.to, self.progress())
    }

    pub fn finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;

    #[test]
    fn reaches_target_after_duration() {
        let mut tween = Tween::new(0.5_f32, 1.25, 1.0);
        assert_eq!(tween.value(), 0.5);
        let half = tween.tick(Duration::from_millis(500));
        assert!((half - 0.875).abs() < 1e-5);
        assert!(!tween.finished());
        let end = tween.tick(Duration::from_millis(750));
        assert_eq!(end, 1.25);
        assert!(tween.finished());
    }

    #[test]
    fn zero_duration_snaps() {
        let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, -4.0), 0.0);
        assert_eq!(tween.value(), Vec2::new(10.0, -4.0));
        assert!(tween.finished());
    }
}
