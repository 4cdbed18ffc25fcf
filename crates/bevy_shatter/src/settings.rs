//! Tunables for the simulation.
//!
//! Defaults reproduce the classic cannon range; every field can be
//! overridden from TOML (missing keys keep their defaults).

use bevy::prelude::*;
use serde::Deserialize;

use crate::playfield::Playfield;

#[derive(Resource, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ShatterSettings {
  pub playfield: Playfield,
  pub physics: PhysicsSettings,
  pub cannon: CannonSettings,
  pub projectile: ProjectileSettings,
  pub fragment: FragmentSettings,
  pub target: TargetSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsSettings {
  /// Downward acceleration in pixels per second squared.
  pub gravity: f32,
  pub floor_friction: f32,
}

impl Default for PhysicsSettings {
  fn default() -> Self {
    Self {
      gravity: 900.0,
      floor_friction: 0.4,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CannonSettings {
  pub length: f32,
  pub width: f32,
  /// Pixels per tick.
  pub move_speed: f32,
  /// Degrees per tick.
  pub rotation_speed: f32,
  /// Impulse given to each projectile.
  pub force: f32,
}

impl Default for CannonSettings {
  fn default() -> Self {
    Self {
      length: 50.0,
      width: 10.0,
      move_speed: 5.0,
      rotation_speed: 2.0,
      force: 1000.0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectileSettings {
  pub radius: f32,
  pub mass: f32,
  pub restitution: f32,
  pub friction: f32,
  /// Speed below which a projectile on the floor counts as resting.
  pub rest_speed: f32,
  /// Extra height above the floor still treated as resting.
  pub rest_slop: f32,
}

impl Default for ProjectileSettings {
  fn default() -> Self {
    Self {
      radius: 5.0,
      mass: 1.0,
      restitution: 0.8,
      friction: 0.5,
      rest_speed: 1.0,
      rest_slop: 2.0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FragmentSettings {
  pub mass: f32,
  pub friction: f32,
  pub restitution: f32,
  pub min_region_size: usize,
  pub simplify_tolerance: f32,
  /// Launch impulse range: x in [-max, max], y in [-max, 0] (screen space).
  pub max_impulse: f32,
  pub max_angular_velocity: f32,
  /// Distance past the playfield edges before a fragment is removed.
  pub removal_margin: f32,
}

impl Default for FragmentSettings {
  fn default() -> Self {
    Self {
      mass: 1.0,
      friction: 0.5,
      restitution: 0.3,
      min_region_size: crate::shatter::DEFAULT_MIN_REGION_SIZE,
      simplify_tolerance: crate::collision::DEFAULT_TOLERANCE,
      max_impulse: 100.0,
      max_angular_velocity: 10.0,
      removal_margin: 100.0,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TargetSettings {
  /// Uniform scale applied to decoded target images.
  pub scale: f32,
  pub respawn_delay_ms: u64,
  /// Radius of the fallback hexagon.
  pub hexagon_radius: f32,
}

impl Default for TargetSettings {
  fn default() -> Self {
    Self {
      scale: 0.5,
      respawn_delay_ms: crate::target::RESPAWN_DELAY.as_millis() as u64,
      hexagon_radius: 50.0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults() {
    let settings: ShatterSettings = toml::from_str(
      r#"
      [cannon]
      force = 1500.0

      [target]
      scale = 1.0
      "#,
    )
    .unwrap();

    assert_eq!(settings.cannon.force, 1500.0);
    assert_eq!(settings.cannon.length, 50.0);
    assert_eq!(settings.target.scale, 1.0);
    assert_eq!(settings.target.respawn_delay_ms, 1000);
    assert_eq!(settings.playfield, Playfield::default());
  }

  #[test]
  fn empty_toml_is_default() {
    let settings: ShatterSettings = toml::from_str("").unwrap();
    assert_eq!(settings, ShatterSettings::default());
  }
}
