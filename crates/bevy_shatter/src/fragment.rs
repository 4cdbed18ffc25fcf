//! Rigid-body fragments produced by shattering a target.
//!
//! A [`FragmentBody`] owns the pixel mask and color of one extracted region,
//! its simplified collision polygon and the launch it receives when spawned.
//! Positions passed to its predicates are in screen space (see
//! [`Playfield`]).

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use crate::collision::{CollisionPolygon, CollisionTag, simplify};
use crate::playfield::Playfield;
use crate::primitives::{BoundingBox, PixelMask};
use crate::render::Rgba;
use crate::settings::FragmentSettings;

/// Initial motion given to a fragment, in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentLaunch {
  /// Applied once at the body's local origin. `y` is never positive, so
  /// fragments never start out moving straight down.
  pub impulse: Vec2,
  /// Radians per second, clockwise on screen.
  pub angular_velocity: f32,
}

impl FragmentLaunch {
  /// Draws an impulse with x in `[-max_impulse, max_impulse]`, y in
  /// `[-max_impulse, 0]` and a spin in `[-max_spin, max_spin]`.
  pub fn random(rng: &mut impl Rng, max_impulse: f32, max_spin: f32) -> Self {
    let max_impulse = max_impulse.abs();
    let max_spin = max_spin.abs();
    Self {
      impulse: Vec2::new(
        rng.random_range(-max_impulse..=max_impulse),
        rng.random_range(-max_impulse..=0.0),
      ),
      angular_velocity: rng.random_range(-max_spin..=max_spin),
    }
  }
}

/// Geometry and state handed to the renderer each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSnapshot {
  pub mask: PixelMask,
  pub color: Rgba,
  /// Screen-space center.
  pub position: Vec2,
  /// Screen-space rotation in radians (clockwise).
  pub rotation: f32,
}

/// One shattered piece of a target.
#[derive(Component, Clone, Debug)]
pub struct FragmentBody {
  color: Rgba,
  mask: PixelMask,
  bounds: BoundingBox,
  polygon: CollisionPolygon,
  launch: FragmentLaunch,
  spawn_position: Vec2,
  mass: f32,
  friction: f32,
  restitution: f32,
  removal_margin: f32,
}

impl FragmentBody {
  /// Builds a fragment centered at `position` with default tunables.
  pub fn new(
    position: Vec2,
    color: Rgba,
    mask: PixelMask,
    bounds: BoundingBox,
    rng: &mut impl Rng,
  ) -> Self {
    Self::with_settings(position, color, mask, bounds, &FragmentSettings::default(), rng)
  }

  pub fn with_settings(
    position: Vec2,
    color: Rgba,
    mask: PixelMask,
    bounds: BoundingBox,
    settings: &FragmentSettings,
    rng: &mut impl Rng,
  ) -> Self {
    let outline = simplify(&outline_points(&mask), settings.simplify_tolerance);
    let polygon = CollisionPolygon::from_outline(outline, bounds.size());
    let launch = FragmentLaunch::random(rng, settings.max_impulse, settings.max_angular_velocity);

    Self {
      color,
      mask,
      bounds,
      polygon,
      launch,
      spawn_position: position,
      mass: settings.mass,
      friction: settings.friction,
      restitution: settings.restitution,
      removal_margin: settings.removal_margin,
    }
  }

  pub fn color(&self) -> Rgba {
    self.color
  }

  pub fn mask(&self) -> &PixelMask {
    &self.mask
  }

  pub fn bounds(&self) -> BoundingBox {
    self.bounds
  }

  pub fn polygon(&self) -> &CollisionPolygon {
    &self.polygon
  }

  pub fn launch(&self) -> FragmentLaunch {
    self.launch
  }

  pub fn spawn_position(&self) -> Vec2 {
    self.spawn_position
  }

  pub fn moment(&self) -> f32 {
    self.polygon.box_moment(self.mass)
  }

  /// True once the fragment has left the playfield by more than the removal
  /// margin: below the bottom edge or past either side.
  pub fn should_remove(&self, position: Vec2, playfield: &Playfield) -> bool {
    let margin = self.removal_margin;
    position.y > playfield.height + margin
      || position.x < -margin
      || position.x > playfield.width + margin
  }

  /// Snapshot of the mask at the body's current pose.
  pub fn render(&self, position: Vec2, rotation: f32) -> FragmentSnapshot {
    FragmentSnapshot {
      mask: self.mask.clone(),
      color: self.color,
      position,
      rotation,
    }
  }

  /// Rapier components for a dynamic body at the spawn position, already
  /// carrying the launch velocity.
  pub fn physics_bundle(&self, playfield: &Playfield) -> impl Bundle + use<> {
    let world_pos = playfield.to_world(self.spawn_position);
    let linvel = playfield.vector_to_world(self.launch.impulse / self.mass);
    let angvel = playfield.angle_to_world(self.launch.angular_velocity);

    (
      CollisionTag::Fragment,
      RigidBody::Dynamic,
      self.polygon.to_collider(),
      ColliderMassProperties::MassProperties(MassProperties {
        mass: self.mass,
        principal_inertia: self.moment(),
        ..default()
      }),
      Friction::coefficient(self.friction),
      Restitution::coefficient(self.restitution),
      Velocity { linvel, angvel },
      Transform::from_translation(world_pos.extend(0.0)),
    )
  }
}

/// Occupied cell coordinates shifted by half the box (integer halves), so
/// the box center is the origin.
///
/// Row-major order, matching how the mask is stored.
pub fn outline_points(mask: &PixelMask) -> Vec<Vec2> {
  let half_w = (mask.width() / 2) as f32;
  let half_h = (mask.height() / 2) as f32;
  mask
    .occupied()
    .map(|(x, y)| Vec2::new(x as f32 - half_w, y as f32 - half_h))
    .collect()
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  use super::*;

  fn block_mask(width: u32, height: u32) -> (PixelMask, BoundingBox) {
    let bounds = BoundingBox::new(0, 0, width, height);
    let pixels: Vec<_> = (0..height)
      .flat_map(|y| (0..width).map(move |x| (x, y)))
      .collect();
    (PixelMask::from_pixels(bounds, &pixels).unwrap(), bounds)
  }

  fn fragment(width: u32, height: u32, seed: u64) -> FragmentBody {
    let (mask, bounds) = block_mask(width, height);
    let mut rng = StdRng::seed_from_u64(seed);
    FragmentBody::new(Vec2::new(600.0, 350.0), Rgba::RED, mask, bounds, &mut rng)
  }

  #[test]
  fn outline_points_are_centered() {
    let (mask, _) = block_mask(4, 2);
    let points = outline_points(&mask);
    assert_eq!(points.len(), 8);
    assert_eq!(points[0], Vec2::new(-2.0, -1.0));
    assert_eq!(points[7], Vec2::new(1.0, 0.0));
  }

  #[test]
  fn outline_points_odd_box_uses_integer_half() {
    let (mask, _) = block_mask(3, 5);
    let points = outline_points(&mask);
    assert_eq!(points[0], Vec2::new(-1.0, -2.0));
    assert_eq!(points[14], Vec2::new(1.0, 2.0));
  }

  #[test]
  fn polygon_always_has_three_vertices() {
    for (w, h) in [(1, 1), (12, 1), (1, 12), (3, 4), (20, 20)] {
      let f = fragment(w, h, 1);
      assert!(f.polygon().len() >= 3, "{w}x{h} produced {:?}", f.polygon());
    }
  }

  #[test]
  fn single_row_mask_uses_box() {
    let f = fragment(12, 1, 7);
    assert_eq!(f.polygon().len(), 4);
    assert_eq!(f.polygon().aabb_size(), Vec2::new(12.0, 1.0));
  }

  #[test]
  fn launch_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
      let launch = FragmentLaunch::random(&mut rng, 100.0, 10.0);
      assert!((-100.0..=100.0).contains(&launch.impulse.x));
      assert!((-100.0..=0.0).contains(&launch.impulse.y));
      assert!((-10.0..=10.0).contains(&launch.angular_velocity));
    }
  }

  #[test]
  fn same_seed_same_launch() {
    assert_eq!(fragment(5, 5, 9).launch(), fragment(5, 5, 9).launch());
  }

  #[test]
  fn removal_bounds() {
    let f = fragment(4, 4, 3);
    let field = Playfield::default();
    assert!(!f.should_remove(Vec2::new(600.0, 1000.0), &field));
    assert!(f.should_remove(Vec2::new(600.0, 1000.5), &field));
    assert!(!f.should_remove(Vec2::new(-100.0, 500.0), &field));
    assert!(f.should_remove(Vec2::new(-100.5, 500.0), &field));
    assert!(f.should_remove(Vec2::new(1300.5, 500.0), &field));
    // Above the playfield is never removed
    assert!(!f.should_remove(Vec2::new(600.0, -5000.0), &field));
  }

  #[test]
  fn render_exposes_pose() {
    let f = fragment(3, 3, 0);
    let snapshot = f.render(Vec2::new(10.0, 20.0), 0.5);
    assert_eq!(snapshot.mask, *f.mask());
    assert_eq!(snapshot.color, Rgba::RED);
    assert_eq!(snapshot.position, Vec2::new(10.0, 20.0));
    assert_eq!(snapshot.rotation, 0.5);
  }

  #[test]
  fn moment_uses_polygon_bounds() {
    let f = fragment(12, 1, 0);
    assert!((f.moment() - (144.0 + 1.0) / 12.0).abs() < 1e-4);
  }
}
