//! Audio module - one-shot sound effects played through kira.

mod plugin;

pub use plugin::{play_sound_effects, AudioFxPlugin, PlaySoundEvent, SoundEffect};
