//! Feeds the cannon input context into [`CannonControl`].

use bevy::{app::AppExit, ecs::message::MessageWriter, prelude::*};
use bevy_enhanced_input::prelude::*;
use bevy_shatter::CannonControl;

use super::actions::{AimCannon, CannonInput, Fire, MoveCannon, Quit};

pub fn spawn_cannon_input(mut commands: Commands) {
  commands.spawn((CannonInput, super::cannon_input_actions()));
}

/// Copies the held axes every frame. Barrel angles grow downward on screen,
/// so raising the barrel is a negative rotation.
pub fn read_cannon_axes(
  contexts: Query<&Actions<CannonInput>>,
  move_actions: Query<(&Action<MoveCannon>, &ActionState)>,
  aim_actions: Query<(&Action<AimCannon>, &ActionState)>,
  mut control: ResMut<CannonControl>,
) {
  let mut move_axis = 0.0;
  let mut aim_axis = 0.0;
  for actions in &contexts {
    for action_entity in actions.iter() {
      if let Ok((action, state)) = move_actions.get(action_entity)
        && matches!(state, ActionState::Fired | ActionState::Ongoing)
      {
        move_axis = **action;
      }
      if let Ok((action, state)) = aim_actions.get(action_entity)
        && matches!(state, ActionState::Fired | ActionState::Ongoing)
      {
        aim_axis = **action;
      }
    }
  }

  control.move_axis = move_axis;
  control.rotate_axis = -aim_axis;
}

/// Tracks whether this press already fired.
#[derive(Default)]
pub struct FireState {
  fired_this_press: bool,
}

/// One shot per key press.
pub fn read_fire(
  contexts: Query<&Actions<CannonInput>>,
  fire_states: Query<&ActionState, With<Action<Fire>>>,
  mut control: ResMut<CannonControl>,
  mut state: Local<FireState>,
) {
  for actions in &contexts {
    for action_entity in actions.iter() {
      let Ok(action_state) = fire_states.get(action_entity) else {
        continue;
      };

      match action_state {
        ActionState::Fired => {
          if !state.fired_this_press {
            state.fired_this_press = true;
            control.fire_requested = true;
          }
        }
        ActionState::None => {
          state.fired_this_press = false;
        }
        _ => {}
      }
    }
  }
}

pub fn read_quit(
  contexts: Query<&Actions<CannonInput>>,
  quit_states: Query<&ActionState, With<Action<Quit>>>,
  mut exit: MessageWriter<AppExit>,
) {
  for actions in &contexts {
    for action_entity in actions.iter() {
      if let Ok(ActionState::Fired) = quit_states.get(action_entity) {
        info!("Quit requested");
        exit.write(AppExit::Success);
      }
    }
  }
}
