//! Sprite sheet and animation clip definitions loaded from RON.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

use crate::world::{read_data_file, DataLoadError};

/// Default location of the animation data file.
pub const ANIMATIONS_PATH: &str = "assets/data/animations.ron";

/// The grid-based sprite sheets the game draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SheetId {
    /// Map tiles, coins, keys and platforms
    Tiles,
    /// The player character
    Characters,
}

/// A sprite sheet laid out as a uniform grid.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetDef {
    pub image: String,
    pub frame_size: (u32, u32),
    pub columns: u32,
    pub rows: u32,
}

/// A named frame sequence on one sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClipDef {
    pub sheet: SheetId,
    pub frames: Vec<usize>,
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default)]
    pub looping: bool,
}

fn default_fps() -> f32 {
    10.0
}

/// A single named frame (used for one-off sprites like the dead player).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StillDef {
    pub sheet: SheetId,
    pub frame: usize,
}

/// All sheet, clip and still definitions.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct AnimationLibrary {
    pub sheets: HashMap<SheetId, SheetDef>,
    pub clips: HashMap<String, ClipDef>,
    #[serde(default)]
    pub stills: HashMap<String, StillDef>,
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        let sheets = HashMap::from([
            (
                SheetId::Tiles,
                SheetDef {
                    image: "tilesheet_complete.png".to_string(),
                    frame_size: (64, 64),
                    columns: 22,
                    rows: 12,
                },
            ),
            (
                SheetId::Characters,
                SheetDef {
                    image: "player/character-sheet.png".to_string(),
                    frame_size: (80, 110),
                    columns: 8,
                    rows: 2,
                },
            ),
        ]);

        let clip = |sheet, frames: &[usize], fps, looping| ClipDef {
            sheet,
            frames: frames.to_vec(),
            fps,
            looping,
        };
        let clips = HashMap::from([
            ("walk".to_string(), clip(SheetId::Characters, &[2, 3], 10.0, true)),
            ("idle".to_string(), clip(SheetId::Characters, &[0], 10.0, true)),
            ("jump".to_string(), clip(SheetId::Characters, &[4], 10.0, false)),
            ("coin".to_string(), clip(SheetId::Tiles, &[58, 36, 14], 10.0, true)),
            ("key".to_string(), clip(SheetId::Tiles, &[101, 79], 2.0, true)),
        ]);

        let stills = HashMap::from([
            ("dead".to_string(), StillDef { sheet: SheetId::Characters, frame: 6 }),
            ("hit".to_string(), StillDef { sheet: SheetId::Characters, frame: 7 }),
        ]);

        Self { sheets, clips, stills }
    }
}

impl AnimationLibrary {
    /// Parse the library from RON text.
    pub fn parse(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Load from the RON file, falling back to the built-in clips.
    pub fn load() -> Self {
        let loaded = read_data_file(ANIMATIONS_PATH)
            .and_then(|contents| Self::parse(&contents, ANIMATIONS_PATH));
        match loaded {
            Ok(library) => {
                info!(
                    "Loaded {} clips and {} stills from {}",
                    library.clips.len(),
                    library.stills.len(),
                    ANIMATIONS_PATH
                );
                library
            }
            Err(e @ DataLoadError::FileNotFound(_)) => {
                warn!("{}. Using built-in animations.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using built-in animations.", e);
                Self::default()
            }
        }
    }

    pub fn clip(&self, name: &str) -> Option<&ClipDef> {
        self.clips.get(name)
    }

    pub fn still(&self, name: &str) -> Option<&StillDef> {
        self.stills.get(name)
    }
}
