//! Cannon projectiles.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::collision::CollisionTag;
use crate::playfield::Playfield;
use crate::render::Rgba;
use crate::settings::ProjectileSettings;

pub const PROJECTILE_COLOR: Rgba = Rgba::rgb(255, 255, 255);

/// A fired projectile. Lives on the dynamic circle body that carries it.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct ProjectileEntity {
  pub radius: f32,
  pub color: Rgba,
  rest_speed: f32,
  rest_slop: f32,
}

impl ProjectileEntity {
  pub fn new(settings: &ProjectileSettings) -> Self {
    Self {
      radius: settings.radius,
      color: PROJECTILE_COLOR,
      rest_speed: settings.rest_speed,
      rest_slop: settings.rest_slop,
    }
  }

  /// True when the projectile left the playfield sideways, fell below it, or
  /// came to rest on the floor. All arguments are in screen space.
  pub fn should_remove(&self, position: Vec2, velocity: Vec2, playfield: &Playfield) -> bool {
    let out_of_bounds =
      position.x < 0.0 || position.x > playfield.width || position.y > playfield.height;
    out_of_bounds || self.is_resting(position, velocity, playfield)
  }

  fn is_resting(&self, position: Vec2, velocity: Vec2, playfield: &Playfield) -> bool {
    let slow = velocity.x.abs() < self.rest_speed && velocity.y.abs() < self.rest_speed;
    let on_floor = position.y >= playfield.floor_line() - self.radius - self.rest_slop;
    slow && on_floor
  }
}

/// Components for a projectile launched from `muzzle` along `aim`, both in
/// screen space.
pub fn projectile_bundle(
  settings: &ProjectileSettings,
  playfield: &Playfield,
  muzzle: Vec2,
  aim: Vec2,
  force: f32,
) -> impl Bundle + use<> {
  let linvel = playfield.vector_to_world(aim.normalize_or_zero() * force / settings.mass);

  (
    ProjectileEntity::new(settings),
    CollisionTag::Projectile,
    RigidBody::Dynamic,
    Collider::ball(settings.radius),
    ColliderMassProperties::MassProperties(MassProperties {
      mass: settings.mass,
      principal_inertia: settings.mass * settings.radius * settings.radius / 2.0,
      ..default()
    }),
    Restitution::coefficient(settings.restitution),
    Friction::coefficient(settings.friction),
    ActiveEvents::COLLISION_EVENTS,
    Ccd::enabled(),
    Velocity {
      linvel,
      angvel: 0.0,
    },
    Transform::from_translation(playfield.to_world(muzzle).extend(0.0)),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn projectile() -> ProjectileEntity {
    ProjectileEntity::new(&ProjectileSettings::default())
  }

  #[test]
  fn stopped_on_floor_is_removed() {
    let field = Playfield::default();
    let p = projectile();
    // Same answer on consecutive frames; the predicate holds no state.
    for _ in 0..2 {
      assert!(p.should_remove(Vec2::new(600.0, 800.0), Vec2::ZERO, &field));
    }
    assert!(p.should_remove(Vec2::new(600.0, 795.0), Vec2::new(0.5, -0.5), &field));
  }

  #[test]
  fn stopped_in_the_air_is_kept() {
    let field = Playfield::default();
    assert!(!projectile().should_remove(Vec2::new(600.0, 400.0), Vec2::ZERO, &field));
  }

  #[test]
  fn moving_on_floor_is_kept() {
    let field = Playfield::default();
    assert!(!projectile().should_remove(Vec2::new(600.0, 795.0), Vec2::new(30.0, 0.0), &field));
  }

  #[test]
  fn leaving_the_field_is_removed() {
    let field = Playfield::default();
    let p = projectile();
    let v = Vec2::new(100.0, 0.0);
    assert!(p.should_remove(Vec2::new(-0.1, 300.0), v, &field));
    assert!(p.should_remove(Vec2::new(1200.1, 300.0), v, &field));
    assert!(p.should_remove(Vec2::new(600.0, 900.1), v, &field));
    // Flying above the top edge is allowed
    assert!(!p.should_remove(Vec2::new(600.0, -300.0), v, &field));
  }
}
