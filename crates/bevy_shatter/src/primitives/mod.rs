//! Grid and box primitives shared by extraction, fragments and targets.

mod rect;
mod surface;

pub use rect::BoundingBox;
pub use surface::{PixelMask, Raster, Surface};
