use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

#[derive(Component)]
pub struct CannonInput;

/// Slide the cannon along the floor; positive is right.
#[derive(Debug, InputAction)]
#[action_output(f32)]
pub struct MoveCannon;

/// Raise or lower the barrel; positive raises.
#[derive(Debug, InputAction)]
#[action_output(f32)]
pub struct AimCannon;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Fire;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Quit;
