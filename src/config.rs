//! Game configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it wants to
//! change. Vectors are written as `[x, y]` arrays.
//!
//! ```json
//! {
//!   "time_step": 0.016666668,
//!   "camera_zoom": 16.0,
//!   "level": { "player": [0.0, -5.0] }
//! }
//! ```

use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for String {
    fn from(err: ConfigError) -> Self {
        err.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
            title: "Game Dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Clap,
    Shoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    pub center: Vec2,
    pub size: Vec2,
}

/// Initial layout of a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub player: Vec2,
    pub ground: GroundConfig,
    pub enemies: Vec<EnemySpawn>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            player: Vec2::new(0.0, -5.0),
            ground: GroundConfig {
                center: Vec2::new(0.0, 5.0),
                size: Vec2::new(20.0, 10.0),
            },
            enemies: vec![
                EnemySpawn {
                    kind: EnemyKind::Clap,
                    position: Vec2::new(5.0, -5.0),
                },
                EnemySpawn {
                    kind: EnemyKind::Shoot,
                    position: Vec2::new(-5.0, -5.0),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds simulated per world update.
    pub time_step: f32,
    /// Upper bound on updates run for one rendered frame.
    pub max_steps_per_frame: u32,
    pub window: WindowConfig,
    /// World units visible across the window.
    pub camera_zoom: f32,
    pub gravity: Vec2,
    pub level: LevelConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            time_step: 1.0 / 60.0,
            max_steps_per_frame: 8,
            window: WindowConfig::default(),
            camera_zoom: 16.0,
            gravity: Vec2::new(0.0, 20.0),
            level: LevelConfig::default(),
        }
    }
}

impl GameConfig {
    /// `<config dir>/platformer/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("platformer").join("config.json"))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when it is missing or broken.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match GameConfig::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                GameConfig::default()
            }
            Err(err) => {
                warn!("Ignoring {}: {}", path.display(), err);
                GameConfig::default()
            }
        }
    }

    /// Writes pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_step must be a positive number, got {}",
                self.time_step
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("max_steps_per_frame must be at least 1".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window must not be empty, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !self.camera_zoom.is_finite() || self.camera_zoom <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera_zoom must be a positive number, got {}",
                self.camera_zoom
            )));
        }
        let ground = self.level.ground.size;
        if ground.x <= 0.0 || ground.y <= 0.0 {
            return Err(ConfigError::Invalid("ground size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_level_layout() {
        let config = GameConfig::default();

        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "Game Dev");
        assert_eq!(config.level.player, Vec2::new(0.0, -5.0));
        assert_eq!(config.level.enemies.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = GameConfig::default();
        config.camera_zoom = 24.0;
        config.level.enemies.truncate(1);

        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "camera_zoom": 32.0, "level": { "enemies": [] } }"#).unwrap();

        let config = GameConfig::load(&path).unwrap();

        assert_eq!(config.camera_zoom, 32.0);
        assert!(config.level.enemies.is_empty());
        assert_eq!(config.level.player, Vec2::new(0.0, -5.0));
        assert_eq!(config.time_step, 1.0 / 60.0);
    }

    #[test]
    fn test_enemy_spawn_json_shape() {
        let spawn: EnemySpawn =
            serde_json::from_str(r#"{ "kind": "Shoot", "position": [1.5, -2.0] }"#).unwrap();

        assert_eq!(spawn.kind, EnemyKind::Shoot);
        assert_eq!(spawn.position, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn test_invalid_time_step_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "time_step": 0.0 }"#).unwrap();

        let err = GameConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(GameConfig::load(&path), Err(ConfigError::Io(_))));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
    }

    #[test]
    fn test_error_converts_to_string() {
        let message: String = ConfigError::Invalid("bad".into()).into();

        assert_eq!(message, "invalid config: bad");
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        if let Some(path) = GameConfig::default_path() {
            assert!(path.ends_with("platformer/config.json"));
        }
    }
}
