mod actions;
mod bindings;
mod control;

use actions::CannonInput;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bindings::cannon_input_actions;

pub struct InputPlugin;

impl Plugin for InputPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(EnhancedInputPlugin)
      .add_input_context::<CannonInput>()
      .add_systems(Startup, control::spawn_cannon_input)
      .add_systems(
        Update,
        (control::read_cannon_axes, control::read_fire, control::read_quit),
      );
  }
}
