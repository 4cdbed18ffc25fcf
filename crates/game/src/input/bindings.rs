use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::actions::{AimCannon, CannonInput, Fire, MoveCannon, Quit};

pub fn cannon_input_actions() -> impl Bundle {
  actions!(CannonInput[
      (
          Action::<MoveCannon>::new(),
          Bindings::spawn((
              Bidirectional::ad_keys(),
              Bidirectional::left_right_arrow(),
          )),
      ),
      (
          Action::<AimCannon>::new(),
          Bindings::spawn((
              Bidirectional::ws_keys(),
              Bidirectional::up_down_arrow(),
          )),
      ),
      (
          Action::<Fire>::new(),
          bindings![KeyCode::Space],
      ),
      (
          Action::<Quit>::new(),
          bindings![KeyCode::Escape],
      ),
  ])
}
