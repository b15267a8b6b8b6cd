//! Frame-stepping animation for atlas sprites.

use bevy::prelude::*;
use std::time::Duration;

use super::data::{AnimationLibrary, ClipDef};

/// Cycles a `Sprite`'s atlas index through a list of frames.
#[derive(Component, Debug, Clone)]
pub struct SpriteAnimation {
    /// Name of the clip currently loaded (empty for anonymous clips)
    pub clip: String,
    pub frames: Vec<usize>,
    pub fps: f32,
    pub looping: bool,
    /// Position within `frames`
    pub cursor: usize,
    /// Fires once per frame step
    pub timer: Timer,
    pub playing: bool,
}

impl SpriteAnimation {
    /// Anonymous clip, used for animated map tiles.
    pub fn from_frames(frames: Vec<usize>, fps: f32, looping: bool) -> Self {
        Self {
            clip: String::new(),
            frames,
            fps,
            looping,
            cursor: 0,
            timer: Timer::from_seconds(frame_secs(fps), TimerMode::Repeating),
            playing: true,
        }
    }

    /// Start a clip from the library, already playing.
    pub fn from_clip(name: &str, clip: &ClipDef) -> Self {
        Self {
            clip: name.to_string(),
            ..Self::from_frames(clip.frames.clone(), clip.fps, clip.looping)
        }
    }

    /// Switch to a named clip. Does nothing if that clip is already
    /// playing, so it can be called every frame.
    pub fn play(&mut self, name: &str, library: &AnimationLibrary) -> bool {
        if self.playing && self.clip == name {
            return false;
        }
        let Some(clip) = library.clip(name) else {
            warn!("Unknown animation clip '{}'", name);
            return false;
        };
        *self = Self::from_clip(name, clip);
        true
    }

    /// Freeze on the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Atlas index of the frame being shown.
    pub fn current_frame(&self) -> Option<usize> {
        self.frames.get(self.cursor).copied()
    }

    /// Step the animation by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        if !self.playing || self.frames.is_empty() || self.fps <= 0.0 {
            return;
        }

        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            if self.cursor + 1 < self.frames.len() {
                self.cursor += 1;
            } else if self.looping {
                self.cursor = 0;
            } else {
                self.playing = false;
                self.timer.reset();
                break;
            }
        }
    }
}

fn frame_secs(fps: f32) -> f32 {
    if fps > 0.0 {
        1.0 / fps
    } else {
        0.0
    }
}
