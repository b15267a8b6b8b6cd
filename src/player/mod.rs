//! Player module - player entity, movement and contacts.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{
    detect_hazards, player_movement, select_animation, spawn_player, step_horizontal,
    step_vertical, PLAYER_Z,
};
pub use plugin::PlayerPlugin;
