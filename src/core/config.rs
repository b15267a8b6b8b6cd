//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking movement, camera and platform parameters without
//! recompilation. Units are pixels and seconds, with +y pointing up.

use bevy::prelude::*;
use serde::Deserialize;
use crate::world::{read_data_file, DataLoadError};

/// Default location of the tuning file.
pub const TUNING_PATH: &str = "assets/data/config/tuning.ron";

/// Tuning loaded from assets/data/config/tuning.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Window
    pub window_title: String,
    pub window_size: (f32, f32),

    // Player movement
    pub acceleration: f32,
    pub max_velocity: f32,
    pub drag: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    pub player_scale: f32,
    /// Unscaled collider half extents of the player body
    pub player_half_extents: (f32, f32),
    /// Length of the ground probe below the collider
    pub ground_probe: f32,

    // Effects
    pub particle_velocity: f32,

    // Camera
    pub camera_zoom: f32,
    pub end_zoom: f32,
    pub end_camera_secs: f32,
    /// Fraction of the remaining distance covered per 60 Hz frame
    pub camera_lerp: f32,
    pub camera_deadzone: (f32, f32),

    // Moving platforms
    pub platform_speed: f32,
    pub platform_reverse_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Cliffside".to_string(),
            window_size: (700.0, 704.0),
            acceleration: 2000.0,
            max_velocity: 500.0,
            drag: 2000.0,
            gravity: 1500.0,
            jump_velocity: 800.0,
            max_fall_speed: 2400.0,
            player_scale: 1.5,
            player_half_extents: (18.0, 28.0),
            ground_probe: 4.0,
            particle_velocity: 100.0,
            camera_zoom: 0.5,
            end_zoom: 1.25,
            end_camera_secs: 1.0,
            camera_lerp: 0.25,
            camera_deadzone: (50.0, 50.0),
            platform_speed: 75.0,
            // 800 frames at 60 Hz
            platform_reverse_secs: 800.0 / 60.0,
        }
    }
}

impl GameConfig {
    /// Parse tuning from RON text. Missing fields keep their defaults.
    pub fn parse(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Load tuning from the RON file, falling back to defaults.
    pub fn load() -> Self {
        match read_data_file(TUNING_PATH).and_then(|contents| Self::parse(&contents, TUNING_PATH)) {
            Ok(config) => {
                info!("Loaded tuning from {}", TUNING_PATH);
                config
            }
            Err(e @ DataLoadError::FileNotFound(_)) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Player body height on screen.
    pub fn player_display_height(&self) -> f32 {
        self.player_half_extents.1 * 2.0 * self.player_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = GameConfig::parse("(gravity: 900.0, camera_zoom: 1.0)", "test.ron").unwrap();
        assert_eq!(config.gravity, 900.0);
        assert_eq!(config.camera_zoom, 1.0);
        assert_eq!(config.jump_velocity, 800.0);
        assert_eq!(config.max_fall_speed, 2400.0);
    }

    #[test]
    fn malformed_file_reports_path() {
        let err = GameConfig::parse("(gravity: \"up\")", "tuning.ron").unwrap_err();
        match err {
            DataLoadError::ParseError { path, .. } => assert_eq!(path, "tuning.ron"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
