//! UI module - loading screen, HUD and pause menu.

mod hud;
mod plugin;

pub use hud::{coin_label, CoinCounter, HudRoot, KeyIndicator};
pub use plugin::UiPlugin;
