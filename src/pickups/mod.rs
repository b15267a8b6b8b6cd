//! Pickups module - collectible coins and the door key.

mod components;
mod plugin;
mod systems;

pub use components::Collectible;
pub use plugin::PickupsPlugin;
pub use systems::{apply_pickups, detect_pickups};
