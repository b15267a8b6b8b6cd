//! Level data structures and RON loading.
//!
//! A level is a stack of character grids sharing one size. Each non-empty
//! character is looked up in a palette: tile palettes map to tileset frames,
//! the object palette maps to coins, keys and moving platforms.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::error::{read_data_file, DataLoadError};
use crate::core::ItemKind;

/// Characters that never hold a tile or object.
fn is_empty_cell(c: char) -> bool {
    c == '.' || c == ' '
}

// === External Palette File Types ===

/// External tile palette file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TilePaletteFile {
    pub tiles: HashMap<char, TileDef>,
}

/// External object palette file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectPaletteFile {
    pub objects: HashMap<char, ObjectKind>,
}

/// Frame cycling for animated map tiles (waterfalls, torches, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileAnimationDef {
    pub frames: Vec<usize>,
    pub fps: f32,
}

fn default_collides() -> bool {
    true
}

/// Definition of a tile in the palette.
#[derive(Debug, Clone, Deserialize)]
pub struct TileDef {
    /// Frame index in the tileset
    pub index: usize,
    /// Only consulted on Ground, Spikes and Door layers
    #[serde(default = "default_collides")]
    pub collides: bool,
    #[serde(default)]
    pub animation: Option<TileAnimationDef>,
}

/// Things placed on the objects grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ObjectKind {
    Coin,
    Key,
    Platform,
}

impl ObjectKind {
    /// The collectible this object becomes, if any.
    pub fn item(&self) -> Option<ItemKind> {
        match self {
            ObjectKind::Coin => Some(ItemKind::Coin),
            ObjectKind::Key => Some(ItemKind::Key),
            ObjectKind::Platform => None,
        }
    }
}

/// Registry storing loaded external palette files.
#[derive(Resource, Default)]
pub struct PaletteRegistry {
    pub tiles: HashMap<String, TilePaletteFile>,
    pub objects: HashMap<String, ObjectPaletteFile>,
}

impl PaletteRegistry {
    /// Get a tile palette by filename.
    pub fn get_tiles(&self, filename: &str) -> Option<&TilePaletteFile> {
        self.tiles.get(filename)
    }

    /// Get an object palette by filename.
    pub fn get_objects(&self, filename: &str) -> Option<&ObjectPaletteFile> {
        self.objects.get(filename)
    }
}

// === Layer Types ===

/// What a layer does besides being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum LayerRole {
    /// Drawn only
    Decoration,
    /// Solid terrain the player stands on
    Ground,
    /// Touching these ends the level
    Spikes,
    /// The exit; needs the key
    Door,
}

impl LayerRole {
    /// Whether tiles on this layer get colliders.
    pub fn is_solid(&self) -> bool {
        !matches!(self, LayerRole::Decoration)
    }
}

/// Scroll factor and offset for background layers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ParallaxDef {
    /// 1.0 scrolls with the world, 0.0 is pinned to the camera
    pub factor: f32,
    /// Offset in pixels from the map origin
    #[serde(default)]
    pub offset: (f32, f32),
}

/// A layer as written in the level file.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub role: LayerRole,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub parallax: Option<ParallaxDef>,
    pub rows: Vec<String>,
}

// === Level Definition ===

fn default_tile_size() -> f32 {
    64.0
}

fn default_platform_tile() -> usize {
    8
}

/// Raw level definition as read from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinitionRaw {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Grid position (column, row from the top)
    pub player_start: (i32, i32),
    #[serde(default = "default_platform_tile")]
    pub platform_tile: usize,

    // External palette file references (optional)
    #[serde(default)]
    pub tile_palette_file: Option<String>,
    #[serde(default)]
    pub object_palette_file: Option<String>,

    // Inline palettes (optional - used as fallback if no external file)
    #[serde(default)]
    pub tile_palette: HashMap<char, TileDef>,
    #[serde(default)]
    pub object_palette: HashMap<char, ObjectKind>,

    // Grids
    pub layers: Vec<LayerDef>,
    #[serde(default)]
    pub objects: Vec<String>,
}

/// A resolved tile on a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    /// Grid position (column, row from the top)
    pub grid: (i32, i32),
    pub index: usize,
    pub collides: bool,
    pub animation: Option<TileAnimationDef>,
}

/// A resolved layer.
#[derive(Debug, Clone)]
pub struct ResolvedLayer {
    pub name: String,
    pub role: LayerRole,
    pub z: f32,
    pub parallax: Option<ParallaxDef>,
    pub tiles: Vec<PlacedTile>,
}

/// A resolved object spawn point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSpawn {
    pub grid: (i32, i32),
    pub kind: ObjectKind,
}

/// A horizontal run of collidable tiles on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColliderRun {
    pub row: i32,
    pub first: i32,
    pub last: i32,
}

impl ColliderRun {
    pub fn len(&self) -> i32 {
        self.last - self.first + 1
    }
}

impl ResolvedLayer {
    /// Merge collidable tiles into horizontal runs so the character
    /// controller doesn't catch on seams between neighbouring tiles.
    pub fn collider_runs(&self) -> Vec<ColliderRun> {
        let mut cells: Vec<(i32, i32)> = self
            .tiles
            .iter()
            .filter(|t| t.collides)
            .map(|t| (t.grid.1, t.grid.0))
            .collect();
        cells.sort_unstable();

        let mut runs: Vec<ColliderRun> = Vec::new();
        for (row, x) in cells {
            match runs.last_mut() {
                Some(run) if run.row == row && run.last + 1 == x => run.last = x,
                _ => runs.push(ColliderRun { row, first: x, last: x }),
            }
        }
        runs
    }
}

/// Processed level definition with resolved tiles.
#[derive(Debug, Clone)]
pub struct LevelDefinition {
    pub name: String,
    pub tile_size: f32,
    pub player_start: (i32, i32),
    pub platform_tile: usize,
    pub width: usize,
    pub height: usize,
    pub layers: Vec<ResolvedLayer>,
    pub objects: Vec<ObjectSpawn>,
}

/// Width of the widest row in a grid.
fn grid_width(rows: &[String]) -> usize {
    rows.iter().map(|row| row.chars().count()).max().unwrap_or(0)
}

impl LevelDefinition {
    /// Create from raw definition by resolving palette references.
    /// Uses PaletteRegistry to look up external palette files.
    pub fn from_raw(raw: LevelDefinitionRaw, palette_registry: &PaletteRegistry) -> Result<Self, DataLoadError> {
        let ground = raw
            .layers
            .iter()
            .find(|layer| layer.role == LayerRole::Ground)
            .ok_or_else(|| DataLoadError::MissingGroundLayer(raw.name.clone()))?;
        let width = grid_width(&ground.rows);
        let height = ground.rows.len();

        let check_dimensions = |layer: &str, rows: &[String]| -> Result<(), DataLoadError> {
            let actual_width = grid_width(rows);
            if rows.len() != height || actual_width != width {
                return Err(DataLoadError::GridMismatch {
                    layer: layer.to_string(),
                    expected_width: width,
                    expected_height: height,
                    actual_width,
                    actual_height: rows.len(),
                });
            }
            Ok(())
        };

        // Resolve tile palette: prefer external file, fallback to inline
        let tile_palette: HashMap<char, TileDef> = if let Some(ref filename) = raw.tile_palette_file {
            palette_registry
                .get_tiles(filename)
                .map(|f| f.tiles.clone())
                .unwrap_or_else(|| {
                    warn!("Tile palette file '{}' not found, using inline", filename);
                    raw.tile_palette.clone()
                })
        } else {
            raw.tile_palette.clone()
        };

        // Resolve object palette: prefer external file, fallback to inline
        let object_palette: HashMap<char, ObjectKind> = if let Some(ref filename) = raw.object_palette_file {
            palette_registry
                .get_objects(filename)
                .map(|f| f.objects.clone())
                .unwrap_or_else(|| {
                    warn!("Object palette file '{}' not found, using inline", filename);
                    raw.object_palette.clone()
                })
        } else {
            raw.object_palette.clone()
        };

        // Resolve tile layers
        let mut layers = Vec::with_capacity(raw.layers.len());
        for layer in &raw.layers {
            check_dimensions(&layer.name, &layer.rows)?;

            let mut tiles = Vec::new();
            for (y, row) in layer.rows.iter().enumerate() {
                for (x, c) in row.chars().enumerate() {
                    if is_empty_cell(c) {
                        continue;
                    }
                    let def = tile_palette.get(&c).ok_or_else(|| DataLoadError::UnknownPaletteEntry {
                        layer: layer.name.clone(),
                        character: c,
                        x,
                        y,
                    })?;
                    tiles.push(PlacedTile {
                        grid: (x as i32, y as i32),
                        index: def.index,
                        collides: layer.role.is_solid() && def.collides,
                        animation: def.animation.clone(),
                    });
                }
            }

            layers.push(ResolvedLayer {
                name: layer.name.clone(),
                role: layer.role,
                z: layer.z,
                parallax: layer.parallax,
                tiles,
            });
        }

        // Resolve object grid
        let mut objects = Vec::new();
        if !raw.objects.is_empty() {
            check_dimensions("Objects", &raw.objects)?;

            for (y, row) in raw.objects.iter().enumerate() {
                for (x, c) in row.chars().enumerate() {
                    if is_empty_cell(c) {
                        continue;
                    }
                    let kind = object_palette.get(&c).ok_or_else(|| DataLoadError::UnknownPaletteEntry {
                        layer: "Objects".to_string(),
                        character: c,
                        x,
                        y,
                    })?;
                    objects.push(ObjectSpawn {
                        grid: (x as i32, y as i32),
                        kind: *kind,
                    });
                }
            }
        }

        let (start_x, start_y) = raw.player_start;
        if start_x < 0 || start_y < 0 || start_x as usize >= width || start_y as usize >= height {
            return Err(DataLoadError::StartOutOfBounds {
                x: start_x,
                y: start_y,
                width,
                height,
            });
        }

        Ok(Self {
            name: raw.name,
            tile_size: raw.tile_size,
            player_start: raw.player_start,
            platform_tile: raw.platform_tile,
            width,
            height,
            layers,
            objects,
        })
    }

    /// Convert grid coordinates to world position (center of tile).
    ///
    /// Row 0 is the top of the map; the world origin is the map's
    /// bottom-left corner with +y up.
    pub fn grid_to_world(&self, x: i32, row: i32) -> Vec2 {
        Vec2::new(
            x as f32 * self.tile_size + self.tile_size / 2.0,
            (self.height as i32 - 1 - row) as f32 * self.tile_size + self.tile_size / 2.0,
        )
    }

    /// Map size in pixels.
    pub fn size_in_pixels(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Number of coins placed in the level.
    pub fn coin_count(&self) -> u32 {
        self.objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Coin)
            .count() as u32
    }
}

/// Parse a level file's contents and resolve it against the palettes.
pub fn parse_level(
    contents: &str,
    path: &str,
    palette_registry: &PaletteRegistry,
) -> Result<LevelDefinition, DataLoadError> {
    let raw = ron::from_str::<LevelDefinitionRaw>(contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })?;
    LevelDefinition::from_raw(raw, palette_registry)
}

/// Resource storing all loaded level definitions.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.get(name)
    }
}

/// Resource indicating which level to load.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: "level1".to_string(),
        }
    }
}

/// Load all external palette files from assets/data/palettes/.
pub fn load_palette_files(mut commands: Commands) {
    let mut registry = PaletteRegistry::default();
    let palettes_path = Path::new("assets/data/palettes");

    if let Ok(entries) = fs::read_dir(palettes_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("")
                .to_string();

            let contents = match read_data_file(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            };

            // Filename convention first, then try each format in order
            if filename.contains("object") {
                match ron::from_str::<ObjectPaletteFile>(&contents) {
                    Ok(palette) => {
                        info!("Loaded object palette: {}", filename);
                        registry.objects.insert(filename, palette);
                    }
                    Err(e) => warn!("Failed to parse object palette {:?}: {}", path, e),
                }
            } else if let Ok(palette) = ron::from_str::<TilePaletteFile>(&contents) {
                info!("Loaded tile palette: {}", filename);
                registry.tiles.insert(filename, palette);
            } else if let Ok(palette) = ron::from_str::<ObjectPaletteFile>(&contents) {
                info!("Loaded object palette: {}", filename);
                registry.objects.insert(filename, palette);
            } else {
                warn!("Unknown palette format in {:?}", path);
            }
        }
    } else {
        info!("Palettes directory not found, using inline palettes only");
    }

    info!(
        "Loaded {} tile, {} object palettes",
        registry.tiles.len(),
        registry.objects.len()
    );
    commands.insert_resource(registry);
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut commands: Commands, palette_registry: Res<PaletteRegistry>) {
    let mut registry = LevelRegistry::default();
    let levels_path = Path::new("assets/data/levels");

    if let Ok(entries) = fs::read_dir(levels_path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            let Some(stem) = path.file_stem() else {
                continue;
            };
            let name = stem.to_string_lossy();
            let level_name = name.strip_suffix(".level").unwrap_or(&name).to_string();

            let contents = match read_data_file(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    error!("{}", e);
                    continue;
                }
            };

            match parse_level(&contents, &path.to_string_lossy(), &palette_registry) {
                Ok(level) => {
                    info!(
                        "Loaded level: {} ({}x{}, {} coins)",
                        level_name,
                        level.width,
                        level.height,
                        level.coin_count()
                    );
                    registry.levels.insert(level_name, level);
                }
                Err(e) => {
                    error!("Failed to load level {:?}: {}", path, e);
                }
            }
        }
    } else {
        warn!("Levels directory not found: {:?}", levels_path);
    }

    info!("Loaded {} level(s)", registry.levels.len());
    commands.insert_resource(registry);
    commands.init_resource::<CurrentLevel>();
}
