//! The player's cannon.
//!
//! The base slides along the floor line and the barrel pivots between
//! pointing right (0°) and pointing left (-180°). Negative angles aim upward
//! because screen space has Y+ down.

use bevy::prelude::*;

use crate::playfield::Playfield;
use crate::settings::CannonSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct Cannon {
  base: Vec2,
  /// Degrees, clamped to [-180, 0].
  angle: f32,
  settings: CannonSettings,
  field_width: f32,
}

impl Cannon {
  /// Places the cannon at the middle of the floor, pointing right.
  pub fn new(settings: CannonSettings, playfield: &Playfield) -> Self {
    Self {
      base: Vec2::new(playfield.width / 2.0, playfield.floor_line()),
      angle: 0.0,
      settings,
      field_width: playfield.width,
    }
  }

  pub fn base(&self) -> Vec2 {
    self.base
  }

  pub fn angle(&self) -> f32 {
    self.angle
  }

  pub fn settings(&self) -> &CannonSettings {
    &self.settings
  }

  /// Swaps tunables, re-clamping the base to the new barrel length.
  pub fn set_settings(&mut self, settings: CannonSettings, playfield: &Playfield) {
    self.settings = settings;
    self.field_width = playfield.width;
    self.move_by(0.0);
  }

  /// Slides the base by `direction` steps, keeping the barrel on screen.
  pub fn move_by(&mut self, direction: f32) {
    let min = self.settings.length;
    let max = (self.field_width - self.settings.length).max(min);
    self.base.x = (self.base.x + direction * self.settings.move_speed).clamp(min, max);
  }

  /// Turns the barrel by `direction` steps. Negative turns upward.
  pub fn rotate_by(&mut self, direction: f32) {
    self.angle = (self.angle + direction * self.settings.rotation_speed).clamp(-180.0, 0.0);
  }

  /// Unit aim vector.
  pub fn aim(&self) -> Vec2 {
    Vec2::from_angle(self.angle.to_radians())
  }

  /// Tip of the barrel, where projectiles appear.
  pub fn muzzle(&self) -> Vec2 {
    self.base + self.aim() * self.settings.length
  }
}

/// Intent for the next simulation tick, written by input handling.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct CannonControl {
  /// -1 moves left, 1 moves right.
  pub move_axis: f32,
  /// -1 aims up, 1 aims down.
  pub rotate_axis: f32,
  pub fire_requested: bool,
}

impl CannonControl {
  /// Consumes a pending fire request.
  pub fn take_fire(&mut self) -> bool {
    std::mem::take(&mut self.fire_requested)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cannon() -> Cannon {
    Cannon::new(CannonSettings::default(), &Playfield::default())
  }

  #[test]
  fn starts_centered_on_floor() {
    let c = cannon();
    assert_eq!(c.base(), Vec2::new(600.0, 800.0));
    assert_eq!(c.angle(), 0.0);
    assert!((c.muzzle() - Vec2::new(650.0, 800.0)).length() < 1e-4);
  }

  #[test]
  fn movement_is_clamped() {
    let mut c = cannon();
    c.move_by(1.0);
    assert_eq!(c.base().x, 605.0);
    for _ in 0..1000 {
      c.move_by(-1.0);
    }
    assert_eq!(c.base().x, 50.0);
    for _ in 0..1000 {
      c.move_by(1.0);
    }
    assert_eq!(c.base().x, 1150.0);
  }

  #[test]
  fn rotation_is_clamped() {
    let mut c = cannon();
    c.rotate_by(1.0);
    assert_eq!(c.angle(), 0.0);
    c.rotate_by(-1.0);
    assert_eq!(c.angle(), -2.0);
    for _ in 0..200 {
      c.rotate_by(-1.0);
    }
    assert_eq!(c.angle(), -180.0);
  }

  #[test]
  fn straight_up_aims_at_the_sky() {
    let mut c = cannon();
    for _ in 0..45 {
      c.rotate_by(-1.0);
    }
    assert_eq!(c.angle(), -90.0);
    assert!((c.muzzle() - Vec2::new(600.0, 750.0)).length() < 1e-3);
  }

  #[test]
  fn fire_is_consumed_once() {
    let mut control = CannonControl {
      fire_requested: true,
      ..default()
    };
    assert!(control.take_fire());
    assert!(!control.take_fire());
  }
}
