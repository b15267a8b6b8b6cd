//! Emitter presets loaded from an external RON file.

use bevy::prelude::*;
use serde::Deserialize;

use crate::world::{read_data_file, DataLoadError};

/// Default location of the emitter presets.
pub const EMITTERS_PATH: &str = "assets/data/vfx/emitters.ron";

/// How an emitter spawns and animates its particles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmitterConfig {
    /// Particle images; one is picked at random per particle
    pub frames: Vec<String>,
    /// Scale at birth and at death
    pub scale: (f32, f32),
    /// Alpha at birth and at death
    pub alpha: (f32, f32),
    /// Seconds a particle lives
    pub lifespan: f32,
    /// Upward acceleration in px/s²
    #[serde(default)]
    pub gravity: f32,
    /// Seconds between emissions; 0 emits every frame
    #[serde(default)]
    pub frequency: f32,
    #[serde(default)]
    pub max_alive: Option<usize>,
    /// Stop by itself after this many seconds
    #[serde(default)]
    pub duration: Option<f32>,
}

/// The three emitters the player carries.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct EmitterPresets {
    pub walking: EmitterConfig,
    pub death: EmitterConfig,
    pub jump: EmitterConfig,
}

impl Default for EmitterPresets {
    fn default() -> Self {
        Self {
            walking: EmitterConfig {
                frames: vec!["particles/circle_05.png".to_string()],
                scale: (0.03, 0.3),
                alpha: (1.0, 0.1),
                lifespan: 0.35,
                gravity: 800.0,
                frequency: 0.1,
                max_alive: None,
                duration: None,
            },
            death: EmitterConfig {
                frames: vec![
                    "particles/trace_05.png".to_string(),
                    "particles/trace_04.png".to_string(),
                ],
                scale: (0.03, 0.5),
                alpha: (1.0, 0.1),
                lifespan: 0.35,
                gravity: 1000.0,
                frequency: 0.0,
                max_alive: None,
                duration: None,
            },
            jump: EmitterConfig {
                frames: vec!["particles/circle_02.png".to_string()],
                scale: (0.03, 0.5),
                alpha: (1.0, 0.1),
                lifespan: 0.35,
                gravity: 0.0,
                frequency: 0.0,
                max_alive: Some(1),
                duration: Some(0.01),
            },
        }
    }
}

impl EmitterPresets {
    pub fn parse(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Load presets from the RON file, falling back to the built-in set.
    pub fn load() -> Self {
        match read_data_file(EMITTERS_PATH).and_then(|contents| Self::parse(&contents, EMITTERS_PATH)) {
            Ok(presets) => {
                info!("Loaded emitter presets from {}", EMITTERS_PATH);
                presets
            }
            Err(e @ DataLoadError::FileNotFound(_)) => {
                warn!("{}. Using built-in emitters.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using built-in emitters.", e);
                Self::default()
            }
        }
    }

    /// Every particle image any preset can use.
    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        [&self.walking, &self.death, &self.jump]
            .into_iter()
            .flat_map(|config| config.frames.iter().map(String::as_str))
    }
}
