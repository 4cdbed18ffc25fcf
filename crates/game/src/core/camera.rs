use bevy::{camera::ScalingMode, prelude::*};

use crate::config::ConfigLoaded;

/// Marker component for the game camera
#[derive(Component)]
pub struct GameCamera;

/// Orthographic 2D camera centered on the playfield. World origin is the
/// playfield center, so the camera stays at the origin.
pub fn setup_camera(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.spawn((
    GameCamera,
    Camera2d,
    Camera {
      order: 0,
      clear_color: ClearColorConfig::Custom(Color::BLACK),
      ..default()
    },
    Projection::Orthographic(OrthographicProjection {
      near: -1000.0,
      far: 1000.0,
      scale: 1.0,
      viewport_origin: Vec2::new(0.5, 0.5),
      scaling_mode: ScalingMode::AutoMin {
        min_width: config.viewport.x,
        min_height: config.viewport.y,
      },
      area: Rect::default(),
    }),
  ));
}
