//! Debug module - physics collider overlay.

mod plugin;

pub use plugin::{toggle_physics_overlay, DebugPlugin};
