use bevy::math::Vec2;

/// Axis-aligned box in raster pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl BoundingBox {
  /// Creates a new box.
  #[inline]
  pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Smallest box containing every point, or `None` for no points.
  pub fn enclosing(points: impl IntoIterator<Item = (u32, u32)>) -> Option<Self> {
    let mut iter = points.into_iter();
    let (x0, y0) = iter.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
    for (x, y) in iter {
      min_x = min_x.min(x);
      min_y = min_y.min(y);
      max_x = max_x.max(x);
      max_y = max_y.max(y);
    }
    Some(Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
  }

  #[inline]
  pub fn area(&self) -> usize {
    (self.width as usize) * (self.height as usize)
  }

  /// Center of the box, in the same pixel space as `x`/`y`.
  #[inline]
  pub fn center(&self) -> Vec2 {
    Vec2::new(
      self.x as f32 + self.width as f32 / 2.0,
      self.y as f32 + self.height as f32 / 2.0,
    )
  }

  /// Size as a float vector.
  #[inline]
  pub fn size(&self) -> Vec2 {
    Vec2::new(self.width as f32, self.height as f32)
  }

  /// Clamps this box to fit within the given bounds.
  pub(crate) fn clamped(&self, bound_width: u32, bound_height: u32) -> Self {
    let x = self.x.min(bound_width);
    let y = self.y.min(bound_height);
    let max_w = bound_width.saturating_sub(x);
    let max_h = bound_height.saturating_sub(y);
    Self {
      x,
      y,
      width: self.width.min(max_w),
      height: self.height.min(max_h),
    }
  }
}
