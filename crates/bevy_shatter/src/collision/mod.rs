//! Collision shapes for targets and fragments.
//!
//! Outlines are traced from pixel grids, reduced with
//! [`simplify`](simplify::simplify) and turned into convex rapier colliders.
//! Every shape carries a [`CollisionTag`] so contact handling can tell
//! projectiles from targets without magic numbers.

mod contour;
mod simplify;

use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;
pub use contour::{outer_outline, trace_outlines};
pub use simplify::{DEFAULT_TOLERANCE, perpendicular_distance, simplify};

/// Identifies what a collider belongs to.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionTag {
  Projectile,
  Target,
  Floor,
  Fragment,
}

impl CollisionTag {
  /// True for the one pairing that shatters a target.
  pub fn is_projectile_hit(a: CollisionTag, b: CollisionTag) -> bool {
    matches!(
      (a, b),
      (CollisionTag::Projectile, CollisionTag::Target) | (CollisionTag::Target, CollisionTag::Projectile)
    )
  }
}

/// Implicitly closed polygon with at least three non-collinear vertices.
///
/// Vertices are in local screen space (Y+ down) around the body origin.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionPolygon {
  vertices: Vec<Vec2>,
}

impl CollisionPolygon {
  /// Uses `outline` when it spans an area, otherwise an axis-aligned box of
  /// `box_size` centered on the origin.
  pub fn from_outline(outline: Vec<Vec2>, box_size: Vec2) -> Self {
    if outline.len() >= 3 && !is_collinear(&outline) {
      Self { vertices: outline }
    } else {
      Self::rectangle(box_size)
    }
  }

  /// Axis-aligned box centered on the origin.
  ///
  /// Sizes below one pixel are raised to one.
  pub fn rectangle(size: Vec2) -> Self {
    let half = size.max(Vec2::ONE) / 2.0;
    Self {
      vertices: vec![
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
      ],
    }
  }

  pub fn vertices(&self) -> &[Vec2] {
    &self.vertices
  }

  pub fn len(&self) -> usize {
    self.vertices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  /// Extent of the axis-aligned bounds of the vertices.
  pub fn aabb_size(&self) -> Vec2 {
    let (min, max) = self
      .vertices
      .iter()
      .fold((Vec2::MAX, Vec2::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    (max - min).max(Vec2::ZERO)
  }

  /// Moment of inertia of a solid box matching the polygon's bounds.
  pub fn box_moment(&self, mass: f32) -> f32 {
    let size = self.aabb_size();
    mass * (size.x * size.x + size.y * size.y) / 12.0
  }

  /// Vertices flipped into world orientation (Y+ up).
  pub fn world_vertices(&self) -> Vec<Vec2> {
    self.vertices.iter().map(|v| Vec2::new(v.x, -v.y)).collect()
  }

  /// Convex hull collider, or a cuboid of the bounds if the hull fails.
  pub fn to_collider(&self) -> Collider {
    Collider::convex_hull(&self.world_vertices()).unwrap_or_else(|| {
      let half = self.aabb_size().max(Vec2::ONE) / 2.0;
      Collider::cuboid(half.x, half.y)
    })
  }
}

fn is_collinear(points: &[Vec2]) -> bool {
  let origin = points[0];
  let Some(&other) = points.iter().find(|&&p| p != origin) else {
    return true;
  };
  let dir = other - origin;
  points
    .iter()
    .all(|&p| dir.perp_dot(p - origin).abs() <= f32::EPSILON * dir.length_squared().max(1.0))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn projectile_hit_is_symmetric() {
    assert!(CollisionTag::is_projectile_hit(
      CollisionTag::Projectile,
      CollisionTag::Target
    ));
    assert!(CollisionTag::is_projectile_hit(
      CollisionTag::Target,
      CollisionTag::Projectile
    ));
    assert!(!CollisionTag::is_projectile_hit(
      CollisionTag::Projectile,
      CollisionTag::Floor
    ));
    assert!(!CollisionTag::is_projectile_hit(
      CollisionTag::Fragment,
      CollisionTag::Target
    ));
  }

  #[test]
  fn short_outline_falls_back_to_box() {
    let polygon = CollisionPolygon::from_outline(vec![Vec2::ZERO, Vec2::X], Vec2::new(6.0, 2.0));
    assert_eq!(polygon.len(), 4);
    assert_eq!(polygon.aabb_size(), Vec2::new(6.0, 2.0));
  }

  #[test]
  fn collinear_outline_falls_back_to_box() {
    let line = vec![Vec2::ZERO, Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
    let polygon = CollisionPolygon::from_outline(line, Vec2::new(3.0, 3.0));
    assert_eq!(polygon.vertices()[0], Vec2::new(-1.5, -1.5));
  }

  #[test]
  fn triangle_is_kept() {
    let triangle = vec![Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 2.0)];
    let polygon = CollisionPolygon::from_outline(triangle.clone(), Vec2::ONE);
    assert_eq!(polygon.vertices(), triangle.as_slice());
    assert_eq!(polygon.aabb_size(), Vec2::new(4.0, 2.0));
  }

  #[test]
  fn box_moment_matches_formula() {
    let polygon = CollisionPolygon::rectangle(Vec2::new(6.0, 8.0));
    assert!((polygon.box_moment(1.0) - 100.0 / 12.0).abs() < 1e-5);
  }

  #[test]
  fn world_vertices_flip_y() {
    let polygon = CollisionPolygon::rectangle(Vec2::new(2.0, 4.0));
    assert_eq!(polygon.world_vertices()[0], Vec2::new(-1.0, 2.0));
  }
}
