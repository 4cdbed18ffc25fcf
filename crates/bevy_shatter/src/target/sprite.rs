use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::collision::{CollisionPolygon, CollisionTag, outer_outline, simplify};
use crate::playfield::Playfield;
use crate::primitives::Raster;
use crate::render::Rgba;

/// An intact target image placed on the playfield.
#[derive(Clone, Debug)]
pub struct TargetSprite {
  name: String,
  raster: Raster,
  /// Screen-space top-left corner of `raster`.
  origin: Vec2,
  polygon: CollisionPolygon,
}

impl TargetSprite {
  /// Crops `raster` to its opaque pixels and centers it at `center`.
  ///
  /// The collision outline is the outer boundary of the alpha mask,
  /// simplified with `tolerance`. Returns `None` for fully transparent
  /// rasters.
  pub fn new(name: impl Into<String>, raster: &Raster, center: Vec2, tolerance: f32) -> Option<Self> {
    let bounds = raster.opaque_bounds()?;
    let raster = raster.crop(bounds);
    let size = bounds.size();

    let outline = outer_outline(&raster.alpha_mask())
      .map(|points| simplify(&points, tolerance))
      .unwrap_or_default()
      .into_iter()
      .map(|p| p - size / 2.0)
      .collect();

    Some(Self {
      name: name.into(),
      raster,
      origin: center - size / 2.0,
      polygon: CollisionPolygon::from_outline(outline, size),
    })
  }

  /// A one-pixel sprite, for radii too small to rasterize anything.
  pub(crate) fn single_pixel(name: impl Into<String>, color: Rgba, center: Vec2) -> Self {
    Self {
      name: name.into(),
      raster: Raster::filled(1, 1, color),
      origin: center - Vec2::splat(0.5),
      polygon: CollisionPolygon::rectangle(Vec2::ONE),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn raster(&self) -> &Raster {
    &self.raster
  }

  pub fn origin(&self) -> Vec2 {
    self.origin
  }

  pub fn size(&self) -> Vec2 {
    Vec2::new(self.raster.width() as f32, self.raster.height() as f32)
  }

  /// Screen-space center of the sprite and of its static body.
  pub fn center(&self) -> Vec2 {
    self.origin + self.size() / 2.0
  }

  pub fn polygon(&self) -> &CollisionPolygon {
    &self.polygon
  }

  /// Rapier components for the static intact body.
  pub fn physics_bundle(&self, playfield: &Playfield) -> impl Bundle + use<> {
    (
      CollisionTag::Target,
      RigidBody::Fixed,
      self.polygon.to_collider(),
      ActiveEvents::COLLISION_EVENTS,
      Transform::from_translation(playfield.to_world(self.center()).extend(0.0)),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sprite_is_cropped_and_centered() {
    let mut raster = Raster::new(40, 40);
    for x in 10..30 {
      for y in 5..15 {
        raster.set(x, y, Rgba::RED);
      }
    }

    let sprite = TargetSprite::new("block", &raster, Vec2::new(600.0, 350.0), 1.0).unwrap();
    assert_eq!(sprite.size(), Vec2::new(20.0, 10.0));
    assert_eq!(sprite.origin(), Vec2::new(590.0, 345.0));
    assert_eq!(sprite.center(), Vec2::new(600.0, 350.0));
    assert_eq!(sprite.polygon().aabb_size(), Vec2::new(20.0, 10.0));
  }

  #[test]
  fn rectangle_outline_simplifies_to_corners() {
    let raster = Raster::filled(8, 6, Rgba::RED);
    let sprite = TargetSprite::new("block", &raster, Vec2::ZERO, 1.0).unwrap();
    let vertices = sprite.polygon().vertices();
    assert!(vertices.contains(&Vec2::new(-4.0, -3.0)));
    assert!(vertices.contains(&Vec2::new(4.0, 3.0)));
    assert!(vertices.len() <= 5);
  }

  #[test]
  fn transparent_raster_has_no_sprite() {
    assert!(TargetSprite::new("empty", &Raster::new(8, 8), Vec2::ZERO, 1.0).is_none());
  }
}
