//! Conversions between rasters/masks and Bevy images.

use bevy::asset::RenderAssetUsages;
use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use super::Rgba;
use crate::primitives::{PixelMask, Raster};

fn blank_image(width: u32, height: u32) -> Image {
  let size = Extent3d {
    width: width.max(1),
    height: height.max(1),
    depth_or_array_layers: 1,
  };

  let mut image = Image::new_fill(
    size,
    TextureDimension::D2,
    &Rgba::TRANSPARENT.to_array(),
    TextureFormat::Rgba8UnormSrgb,
    RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
  );

  // Pixel sprites stay crisp when scaled
  image.sampler = ImageSampler::nearest();
  image
}

/// Creates an RGBA8 texture from a raster.
pub fn raster_image(raster: &Raster) -> Image {
  let mut image = blank_image(raster.width(), raster.height());
  if let Some(ref mut data) = image.data {
    for (i, pixel) in raster.as_slice().iter().enumerate() {
      data[i * 4..i * 4 + 4].copy_from_slice(&pixel.to_array());
    }
  }
  image
}

/// Creates an RGBA8 texture painting the mask's occupied cells in `color`.
pub fn mask_image(mask: &PixelMask, color: Rgba) -> Image {
  let mut image = blank_image(mask.width(), mask.height());
  let width = mask.width() as usize;
  if let Some(ref mut data) = image.data {
    for (x, y) in mask.occupied() {
      let i = (y as usize * width + x as usize) * 4;
      data[i..i + 4].copy_from_slice(&color.to_array());
    }
  }
  image
}

/// Reads an RGBA8 image back into a raster.
///
/// Returns `None` for empty images or images without an alpha channel.
pub fn raster_from_image(image: &Image) -> Option<Raster> {
  let width = image.width();
  let height = image.height();
  if width == 0 || height == 0 {
    return None;
  }

  let data = image.data.as_ref()?;
  let bytes_per_pixel = data.len() / (width as usize * height as usize);
  if bytes_per_pixel != 4 {
    return None;
  }

  let pixels = data
    .chunks_exact(4)
    .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
    .collect();
  Raster::from_vec(width, height, pixels)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::BoundingBox;

  #[test]
  fn raster_survives_image_conversion() {
    let mut raster = Raster::new(3, 2);
    raster.set(0, 0, Rgba::RED);
    raster.set(2, 1, Rgba::new(1, 2, 3, 4));

    let image = raster_image(&raster);
    assert_eq!(image.width(), 3);
    assert_eq!(image.height(), 2);
    assert_eq!(raster_from_image(&image), Some(raster));
  }

  #[test]
  fn mask_image_leaves_empty_cells_transparent() {
    let mask = PixelMask::from_pixels(BoundingBox::new(0, 0, 2, 1), &[(1, 0)]).unwrap();
    let image = mask_image(&mask, Rgba::rgb(10, 20, 30));
    let data = image.data.as_ref().unwrap();
    assert_eq!(&data[0..4], &[0, 0, 0, 0]);
    assert_eq!(&data[4..8], &[10, 20, 30, 255]);
  }
}
