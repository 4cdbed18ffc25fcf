mod plugin;

use std::path::{Path, PathBuf};

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
use bevy_shatter::ShatterSettings;
pub use plugin::ConfigPlugin;
use serde::Deserialize;

pub const CONFIG_PATH: &str = "assets/config/game.config.toml";

#[derive(Asset, TypePath, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub targets: TargetsConfig,
  pub shatter: ShatterSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

impl Default for WindowConfig {
  fn default() -> Self {
    Self {
      width: 1200,
      height: 900,
      title: "Shatter".to_string(),
    }
  }
}

/// Visible area in world pixels. Zero means "fit the playfield".
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TargetsConfig {
  /// Directory scanned for `*.png` target images.
  pub directory: PathBuf,
}

impl Default for TargetsConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from("assets/targets"),
    }
  }
}

#[derive(Debug)]
pub enum ConfigError {
  Read { path: PathBuf, source: std::io::Error },
  Parse { path: PathBuf, source: toml::de::Error },
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Read { path, source } => write!(f, "failed to read {}: {}", path.display(), source),
      Self::Parse { path, source } => write!(f, "failed to parse {}: {}", path.display(), source),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Read { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
    }
  }
}

impl GameConfig {
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Viewport size, falling back to the playfield when unset.
  pub fn viewport(&self) -> Vec2 {
    let playfield = &self.shatter.playfield;
    let width = if self.camera.viewport_width > 0.0 {
      self.camera.viewport_width
    } else {
      playfield.width
    };
    let height = if self.camera.viewport_height > 0.0 {
      self.camera.viewport_height
    } else {
      playfield.height
    };
    Vec2::new(width, height)
  }
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub viewport: Vec2,
  pub targets: TargetsConfig,
  pub shatter: ShatterSettings,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      viewport: config.viewport(),
      window: config.window,
      targets: config.targets,
      shatter: config.shatter,
    }
  }
}
