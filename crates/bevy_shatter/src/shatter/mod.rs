//! Raster fragmentation.

mod extract;

pub use extract::{
  ConnectedRegion, DEFAULT_MIN_REGION_SIZE, ExtractedRegion, extract_regions, find_regions,
};
