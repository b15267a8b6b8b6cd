//! VFX module - small sprite particle emitters.

mod components;
mod data;
mod plugin;
mod systems;

pub use components::*;
pub use data::{EmitterConfig, EmitterPresets, EMITTERS_PATH};
pub use plugin::VfxPlugin;
pub use systems::spawn_emitters;
