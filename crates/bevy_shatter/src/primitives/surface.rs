//! Fixed-size 2D grids.
//!
//! A [`Surface`] is a generic row-major buffer with bounds-checked access.
//! [`Raster`] holds decoded sprite pixels and [`PixelMask`] holds the cells
//! of a single fragment.
//!
//! # Coordinate System
//!
//! Surfaces follow image-file conventions:
//! - **X+** is to the right
//! - **Y+** is downward
//! - **(0, 0)** is the top-left corner

use std::ops::{Index, IndexMut};

use super::BoundingBox;
use crate::render::Rgba;

/// A 2D buffer of elements.
///
/// Data is stored in row-major order (y * width + x).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface<T> {
  data: Box<[T]>,
  width: u32,
  height: u32,
}

/// Decoded sprite pixels.
pub type Raster = Surface<Rgba>;

impl<T: Clone + Default> Surface<T> {
  /// Creates a new surface filled with the default value.
  pub fn new(width: u32, height: u32) -> Self {
    Self::filled(width, height, T::default())
  }
}

impl<T: Clone> Surface<T> {
  /// Creates a new surface filled with the given value.
  pub fn filled(width: u32, height: u32, value: T) -> Self {
    let len = (width as usize) * (height as usize);
    Self {
      data: vec![value; len].into_boxed_slice(),
      width,
      height,
    }
  }

  /// Copies the cells inside `rect` into a new surface.
  ///
  /// `rect` is clamped to this surface first.
  pub fn crop(&self, rect: BoundingBox) -> Self {
    let rect = rect.clamped(self.width, self.height);
    let mut data = Vec::with_capacity(rect.area());
    for y in rect.y..rect.y + rect.height {
      let start = (y as usize) * (self.width as usize) + rect.x as usize;
      data.extend_from_slice(&self.data[start..start + rect.width as usize]);
    }
    Self {
      data: data.into_boxed_slice(),
      width: rect.width,
      height: rect.height,
    }
  }

  /// Nearest-neighbor resample by `factor`.
  ///
  /// Dimensions are rounded down and never drop below one cell.
  pub fn scaled(&self, factor: f32) -> Self {
    if self.is_empty() {
      return self.clone();
    }
    let width = ((self.width as f32 * factor) as u32).max(1);
    let height = ((self.height as f32 * factor) as u32).max(1);
    let mut data = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
      let sy = ((y as f32 + 0.5) / factor) as u32;
      let sy = sy.min(self.height - 1);
      for x in 0..width {
        let sx = ((x as f32 + 0.5) / factor) as u32;
        let sx = sx.min(self.width - 1);
        data.push(self[(sx, sy)].clone());
      }
    }
    Self {
      data: data.into_boxed_slice(),
      width,
      height,
    }
  }
}

impl<T> Surface<T> {
  /// Builds a surface from row-major data.
  ///
  /// Returns `None` when `data.len()` does not match the dimensions.
  pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Option<Self> {
    if data.len() != (width as usize) * (height as usize) {
      return None;
    }
    Some(Self {
      data: data.into_boxed_slice(),
      width,
      height,
    })
  }

  /// Returns the width of the surface.
  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Returns the height of the surface.
  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Returns true if the surface holds no cells.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Converts (x, y) to a linear index, or `None` if out of bounds.
  #[inline]
  pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
    if x < self.width && y < self.height {
      Some((y as usize) * (self.width as usize) + (x as usize))
    } else {
      None
    }
  }

  /// Returns a reference to the element at (x, y), or `None` if out of bounds.
  #[inline]
  pub fn get(&self, x: u32, y: u32) -> Option<&T> {
    self.index_of(x, y).map(|i| &self.data[i])
  }

  /// Sets the element at (x, y). Returns `true` if successful, `false` if out
  /// of bounds.
  #[inline]
  pub fn set(&mut self, x: u32, y: u32, value: T) -> bool {
    if let Some(i) = self.index_of(x, y) {
      self.data[i] = value;
      true
    } else {
      false
    }
  }

  /// Returns a slice of the underlying data.
  #[inline]
  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  /// Iterates `(x, y, &value)` in row-major order.
  pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &T)> {
    let width = self.width.max(1);
    self
      .data
      .iter()
      .enumerate()
      .map(move |(i, v)| ((i as u32) % width, (i as u32) / width, v))
  }
}

impl<T> Index<(u32, u32)> for Surface<T> {
  type Output = T;

  fn index(&self, (x, y): (u32, u32)) -> &Self::Output {
    let i = self
      .index_of(x, y)
      .unwrap_or_else(|| panic!("surface index ({x}, {y}) out of bounds"));
    &self.data[i]
  }
}

impl<T> IndexMut<(u32, u32)> for Surface<T> {
  fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut Self::Output {
    let i = self
      .index_of(x, y)
      .unwrap_or_else(|| panic!("surface index ({x}, {y}) out of bounds"));
    &mut self.data[i]
  }
}

impl Raster {
  /// Tight bounds of all pixels with non-zero alpha.
  pub fn opaque_bounds(&self) -> Option<BoundingBox> {
    BoundingBox::enclosing(
      self
        .iter_cells()
        .filter(|(_, _, p)| p.is_opaque())
        .map(|(x, y, _)| (x, y)),
    )
  }

  /// Returns the alpha channel as a mask.
  pub fn alpha_mask(&self) -> Surface<bool> {
    Surface {
      data: self.data.iter().map(Rgba::is_opaque).collect(),
      width: self.width,
      height: self.height,
    }
  }
}

/// The occupied cells of one fragment, relative to its bounding box.
///
/// Dimensions always equal the box dimensions and at least one cell is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelMask {
  cells: Surface<bool>,
}

impl PixelMask {
  /// Builds a mask covering `bounds` from absolute pixel coordinates.
  ///
  /// Returns `None` if no pixel lands inside `bounds`.
  pub fn from_pixels(bounds: BoundingBox, pixels: &[(u32, u32)]) -> Option<Self> {
    let mut cells = Surface::filled(bounds.width, bounds.height, false);
    let mut any = false;
    for &(x, y) in pixels {
      if x < bounds.x || y < bounds.y {
        continue;
      }
      any |= cells.set(x - bounds.x, y - bounds.y, true);
    }
    any.then_some(Self { cells })
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.cells.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.cells.height()
  }

  /// Returns true if the cell at (x, y) is occupied. Out of bounds is empty.
  #[inline]
  pub fn contains(&self, x: u32, y: u32) -> bool {
    self.cells.get(x, y).copied().unwrap_or(false)
  }

  /// Number of occupied cells.
  pub fn count(&self) -> usize {
    self.cells.as_slice().iter().filter(|&&c| c).count()
  }

  /// Occupied cells in row-major order.
  pub fn occupied(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
    self
      .cells
      .iter_cells()
      .filter(|(_, _, c)| **c)
      .map(|(x, y, _)| (x, y))
  }
}
