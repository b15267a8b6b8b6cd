//! Emitter and particle components.

use bevy::prelude::*;
use std::time::Duration;

use super::data::EmitterConfig;

/// Dust kicked up behind the player while walking.
#[derive(Component)]
pub struct WalkingVfx;

/// Puff under the player's feet on take-off.
#[derive(Component)]
pub struct JumpVfx;

/// Burst shown when the player dies.
#[derive(Component)]
pub struct DeathVfx;

/// Keeps an emitter glued to another entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterFollow {
    pub target: Entity,
    pub offset: Vec2,
}

/// Spawns particles at its own position while active.
#[derive(Component, Debug, Clone)]
pub struct ParticleEmitter {
    pub config: EmitterConfig,
    pub active: bool,
    /// Initial velocity given to each particle
    pub speed: Vec2,
    pub follow: Option<EmitterFollow>,
    /// Fires once per emission
    pub emit_timer: Timer,
    /// Runs from `start` until the configured duration
    pub lifetime: Timer,
}

impl ParticleEmitter {
    /// A stopped emitter.
    pub fn new(config: EmitterConfig) -> Self {
        let emit_timer = Timer::from_seconds(config.frequency.max(0.0), TimerMode::Repeating);
        let lifetime = Timer::from_seconds(config.duration.unwrap_or(0.0).max(0.0), TimerMode::Once);
        Self {
            config,
            active: false,
            speed: Vec2::ZERO,
            follow: None,
            emit_timer,
            lifetime,
        }
    }

    /// Begin emitting; the first particle comes out on the next tick.
    /// Calling `start` on a running emitter leaves its rhythm alone.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        let period = self.emit_timer.duration();
        self.emit_timer.set_elapsed(period);
        self.lifetime.reset();
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn start_follow(&mut self, target: Entity, offset: Vec2) {
        self.follow = Some(EmitterFollow { target, offset });
    }

    pub fn stop_follow(&mut self) {
        self.follow = None;
    }

    pub fn set_speed(&mut self, speed: Vec2) {
        self.speed = speed;
    }

    /// How many particles to spawn this tick, given `alive` particles
    /// from this emitter still on screen.
    pub fn due(&mut self, delta: Duration, alive: usize) -> usize {
        if !self.active {
            return 0;
        }

        let mut count = if self.config.frequency <= 0.0 {
            1
        } else {
            self.emit_timer.tick(delta);
            self.emit_timer.times_finished_this_tick() as usize
        };
        if let Some(max) = self.config.max_alive {
            count = count.min(max.saturating_sub(alive));
        }

        if self.config.duration.is_some() && self.lifetime.tick(delta).finished() {
            self.active = false;
        }
        count
    }
}

/// A single live particle.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    pub emitter: Entity,
    pub velocity: Vec2,
    pub gravity: f32,
    pub age: f32,
    pub lifespan: f32,
    pub scale: (f32, f32),
    pub alpha: (f32, f32),
}

impl Particle {
    /// Life fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.lifespan <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifespan).clamp(0.0, 1.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifespan
    }

    pub fn current_scale(&self) -> f32 {
        self.scale.0 + (self.scale.1 - self.scale.0) * self.progress()
    }

    pub fn current_alpha(&self) -> f32 {
        self.alpha.0 + (self.alpha.1 - self.alpha.0) * self.progress()
    }
}
