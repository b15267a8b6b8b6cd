//! Camera module - following, map bounds and scripted zoom and pan.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::{CameraPlugin, CameraSet};
pub use systems::{
    begin_camera_move, clamp_to_bounds, deadzone_goal, frame_lerp, reset_camera, zoom_to_scale,
};
