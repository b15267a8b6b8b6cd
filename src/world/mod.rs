//! World module - level data, tile layers, parallax and moving platforms.

mod builder;
mod data;
mod error;
mod parallax;
mod platforms;
mod plugin;
mod spawning;

pub use builder::{HazardTile, LevelEntity, SolidTile, TileLayer, WorldBound};
pub use data::{
    CurrentLevel, LayerRole, LevelDefinition, LevelRegistry, ObjectKind, PaletteRegistry,
};
pub use error::{read_data_file, DataLoadError};
pub use parallax::{apply_parallax, Parallax};
pub use platforms::{MovingPlatform, PlatformCycle};
pub use plugin::{setup_level, WorldPlugin};
