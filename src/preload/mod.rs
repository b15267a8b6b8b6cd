//! Preload module - the loading screen that gathers assets before play.

mod assets;
mod plugin;

pub use assets::{GameAssets, SheetHandles};
pub use plugin::{request_assets, PreloadPlugin};
