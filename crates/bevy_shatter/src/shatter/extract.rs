//! Connected same-color region extraction.
//!
//! Splits a raster into 4-connected regions of identical opaque color. The
//! source raster is only read; a separate visited grid tracks progress, and
//! flood fill uses an explicit stack so large regions cannot overflow the
//! call stack.

use bevy::math::Vec2;

use crate::primitives::{BoundingBox, PixelMask, Raster, Surface};
use crate::render::Rgba;

/// Regions smaller than this many pixels are treated as noise.
pub const DEFAULT_MIN_REGION_SIZE: usize = 10;

/// One flood-filled region in raster coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectedRegion {
  pub color: Rgba,
  pub bounds: BoundingBox,
  /// Unique pixel coordinates in fill order.
  pub pixels: Vec<(u32, u32)>,
}

/// A region ready to become a fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractedRegion {
  pub color: Rgba,
  pub bounds: BoundingBox,
  pub mask: PixelMask,
  /// Box center relative to the raster's top-left corner.
  pub centroid_offset: Vec2,
}

impl ExtractedRegion {
  pub fn pixel_count(&self) -> usize {
    self.mask.count()
  }
}

/// Finds every connected region with at least `min_region_size` pixels.
///
/// Pixels are scanned column by column (x outer, y inner). Discarded regions
/// stay visited and are never rescanned.
pub fn find_regions(raster: &Raster, min_region_size: usize) -> Vec<ConnectedRegion> {
  let mut visited = Surface::filled(raster.width(), raster.height(), false);
  let mut stack = Vec::new();
  let mut regions = Vec::new();

  for x in 0..raster.width() {
    for y in 0..raster.height() {
      let seed = raster[(x, y)];
      if !seed.is_opaque() || visited[(x, y)] {
        continue;
      }

      let pixels = flood_fill(raster, &mut visited, &mut stack, (x, y), seed);
      if pixels.len() < min_region_size {
        continue;
      }

      if let Some(bounds) = BoundingBox::enclosing(pixels.iter().copied()) {
        regions.push(ConnectedRegion {
          color: seed,
          bounds,
          pixels,
        });
      }
    }
  }

  regions
}

/// Extracts regions with box-relative masks.
pub fn extract_regions(raster: &Raster, min_region_size: usize) -> Vec<ExtractedRegion> {
  find_regions(raster, min_region_size)
    .into_iter()
    .filter_map(|region| {
      let mask = PixelMask::from_pixels(region.bounds, &region.pixels)?;
      Some(ExtractedRegion {
        color: region.color,
        bounds: region.bounds,
        centroid_offset: region.bounds.center(),
        mask,
      })
    })
    .collect()
}

/// Collects all pixels 4-connected to `seed_pos` with exactly `color`.
///
/// `stack` is scratch space reused across calls and is empty on return.
fn flood_fill(
  raster: &Raster,
  visited: &mut Surface<bool>,
  stack: &mut Vec<(u32, u32)>,
  seed_pos: (u32, u32),
  color: Rgba,
) -> Vec<(u32, u32)> {
  let mut pixels = Vec::new();
  visited.set(seed_pos.0, seed_pos.1, true);
  stack.push(seed_pos);

  while let Some((x, y)) = stack.pop() {
    pixels.push((x, y));

    let neighbors = [
      x.checked_add(1).map(|nx| (nx, y)),
      x.checked_sub(1).map(|nx| (nx, y)),
      y.checked_add(1).map(|ny| (x, ny)),
      y.checked_sub(1).map(|ny| (x, ny)),
    ];
    for (nx, ny) in neighbors.into_iter().flatten() {
      if raster.get(nx, ny) != Some(&color) {
        continue;
      }
      if visited.get(nx, ny) == Some(&false) {
        visited.set(nx, ny, true);
        stack.push((nx, ny));
      }
    }
  }

  pixels
}
