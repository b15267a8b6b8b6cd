//! Core game module - states, events, tuning and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod events;
mod plugin;
mod states;
mod tween;

pub use config::{GameConfig, TUNING_PATH};
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::*;
