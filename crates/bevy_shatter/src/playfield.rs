//! Playfield dimensions and coordinate conversion.
//!
//! Gameplay rules are written in screen space: origin at the top-left corner,
//! X+ right, Y+ down, one unit per pixel. Bevy and rapier use world space with
//! the origin at the playfield center and Y+ up.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Playfield {
  pub width: f32,
  pub height: f32,
  pub floor_height: f32,
}

impl Default for Playfield {
  fn default() -> Self {
    Self {
      width: 1200.0,
      height: 900.0,
      floor_height: 100.0,
    }
  }
}

impl Playfield {
  /// Screen-space y of the floor surface.
  #[inline]
  pub fn floor_line(&self) -> f32 {
    self.height - self.floor_height
  }

  /// Screen-space center where intact targets are placed.
  #[inline]
  pub fn target_center(&self) -> Vec2 {
    Vec2::new(self.width / 2.0, self.height / 2.0 - self.floor_height)
  }

  /// Floor rectangle as (screen center, size).
  pub fn floor_rect(&self) -> (Vec2, Vec2) {
    (
      Vec2::new(self.width / 2.0, self.floor_line() + self.floor_height / 2.0),
      Vec2::new(self.width, self.floor_height),
    )
  }

  #[inline]
  pub fn to_world(&self, screen: Vec2) -> Vec2 {
    Vec2::new(screen.x - self.width / 2.0, self.height / 2.0 - screen.y)
  }

  #[inline]
  pub fn to_screen(&self, world: Vec2) -> Vec2 {
    Vec2::new(world.x + self.width / 2.0, self.height / 2.0 - world.y)
  }

  /// Converts a direction or velocity. Only the y axis flips.
  #[inline]
  pub fn vector_to_world(&self, v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
  }

  #[inline]
  pub fn vector_to_screen(&self, v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
  }

  /// Screen angles turn clockwise, world angles counter-clockwise.
  #[inline]
  pub fn angle_to_world(&self, radians: f32) -> f32 {
    -radians
  }

  #[inline]
  pub fn angle_to_screen(&self, radians: f32) -> f32 {
    -radians
  }
}
