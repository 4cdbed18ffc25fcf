use std::path::{Path, PathBuf};

use bevy::{
  asset::AssetEvent, camera::ScalingMode, ecs::message::MessageReader, prelude::*,
  window::PrimaryWindow,
};
use bevy_common_assets::toml::TomlAssetPlugin;
use bevy_shatter::{ShatterSettings, TargetLibrary};

use super::{CONFIG_PATH, ConfigHandle, ConfigLoaded, GameConfig};

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(TomlAssetPlugin::<GameConfig>::new(&["config.toml"]))
      .add_systems(PreStartup, load_config_sync)
      .add_systems(
        Update,
        (
          watch_config_changes,
          (
            update_window_on_config_change,
            update_camera_on_config_change,
            update_shatter_on_config_change,
            update_targets_on_config_change,
          ),
        )
          .chain(),
      );
  }
}

fn load_config_sync(mut commands: Commands, asset_server: Res<AssetServer>) {
  let handle: Handle<GameConfig> = asset_server.load("config/game.config.toml");
  commands.insert_resource(ConfigHandle(handle));

  let config = GameConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
    warn!("{}; using built-in defaults", e);
    GameConfig::default()
  });

  let library = load_targets(&config.targets.directory, config.shatter.target.scale);
  commands.insert_resource(library);
  commands.insert_resource(config.shatter.clone());
  commands.insert_resource(ConfigLoaded::from(config));
}

fn load_targets(directory: &Path, scale: f32) -> TargetLibrary {
  let library = TargetLibrary::load_dir_or_fallback(directory, scale);
  if !library.is_empty() {
    info!(
      "Loaded {} target image(s) from {}: {:?}",
      library.len(),
      directory.display(),
      library.names().collect::<Vec<_>>()
    );
  }
  library
}

fn watch_config_changes(
  mut commands: Commands,
  config_handle: Res<ConfigHandle>,
  mut messages: MessageReader<AssetEvent<GameConfig>>,
  configs: Res<Assets<GameConfig>>,
) {
  for event in messages.read() {
    if let AssetEvent::Modified { id } = event
      && config_handle.0.id() == *id
      && let Some(config) = configs.get(&config_handle.0)
    {
      info!("Config reloaded!");
      commands.insert_resource(ConfigLoaded::from(config.clone()));
    }
  }
}

fn update_window_on_config_change(
  config: Res<ConfigLoaded>,
  mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
  if config.is_changed()
    && let Ok(mut window) = windows.single_mut()
  {
    window
      .resolution
      .set(config.window.width as f32, config.window.height as f32);
    window.title.clone_from(&config.window.title);
  }
}

fn update_camera_on_config_change(
  config: Res<ConfigLoaded>,
  mut camera_query: Query<&mut Projection, With<Camera2d>>,
) {
  if config.is_changed() {
    for mut projection in camera_query.iter_mut() {
      if let Projection::Orthographic(ref mut ortho) = *projection {
        ortho.scaling_mode = ScalingMode::AutoMin {
          min_width: config.viewport.x,
          min_height: config.viewport.y,
        };
      }
    }
  }
}

/// Pushes reloaded tunables into the simulation. The playfield is fixed once
/// the simulation has started.
fn update_shatter_on_config_change(
  config: Res<ConfigLoaded>,
  mut settings: ResMut<ShatterSettings>,
) {
  if config.is_changed() && *settings != config.shatter {
    *settings = config.shatter.clone();
  }
}

/// Rescans the target directory when its path or scale changes. Takes effect
/// at the next respawn.
fn update_targets_on_config_change(
  config: Res<ConfigLoaded>,
  mut library: ResMut<TargetLibrary>,
  mut loaded: Local<Option<(PathBuf, f32)>>,
) {
  if !config.is_changed() {
    return;
  }
  let current = (config.targets.directory.clone(), config.shatter.target.scale);
  match loaded.as_ref() {
    None => *loaded = Some(current),
    Some(previous) if *previous == current => {}
    Some(_) => {
      *library = load_targets(&current.0, current.1);
      *loaded = Some(current);
    }
  }
}
