use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
  fn build(&self, app: &mut App) {
    // The shatter systems bracket the physics step inside the fixed tick.
    app.add_plugins(
      RapierPhysicsPlugin::<NoUserData>::default()
        .with_length_unit(50.0)
        .in_fixed_schedule(),
    );
  }
}
