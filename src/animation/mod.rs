//! Animation module - sprite sheets, named clips and frame stepping.

mod components;
mod data;
mod plugin;

pub use components::SpriteAnimation;
pub use data::{AnimationLibrary, ClipDef, SheetDef, SheetId, StillDef, ANIMATIONS_PATH};
pub use plugin::{advance_sprite_animations, AnimationPlugin};
