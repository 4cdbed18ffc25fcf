pub(crate) mod camera;
mod physics;

use bevy::prelude::*;
use bevy_shatter::ShatterPlugin;

pub struct CorePlugin;

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(physics::PhysicsPlugin)
      .add_plugins(ShatterPlugin::default())
      .add_systems(Startup, camera::setup_camera);
  }
}
