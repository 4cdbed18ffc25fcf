//! Pixel types and texture helpers for drawing targets and fragments.

mod image;
mod rgba;

pub use image::{mask_image, raster_from_image, raster_image};
pub use rgba::Rgba;
