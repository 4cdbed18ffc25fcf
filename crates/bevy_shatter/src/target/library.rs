//! Target image catalogue.
//!
//! Images are decoded once at startup with Bevy's image decoder and kept as
//! rasters. Selection is random; when nothing usable was loaded a solid red
//! hexagon is rasterized instead, so a target can always be produced.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};
use std::io;
use std::path::{Path, PathBuf};

use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageSampler, ImageType};
use bevy::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::TargetSprite;
use crate::playfield::Playfield;
use crate::primitives::Raster;
use crate::render::{Rgba, raster_from_image};
use crate::settings::ShatterSettings;

/// Name reported for the procedural fallback shape.
pub const FALLBACK_NAME: &str = "hexagon";

/// Error loading target images.
#[derive(Debug)]
pub enum TargetLoadError {
  MissingDirectory(PathBuf),
  ReadDirectory { path: PathBuf, source: io::Error },
  NoImages(PathBuf),
  Decode { path: PathBuf, reason: String },
  EmptyImage(PathBuf),
}

impl std::fmt::Display for TargetLoadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::MissingDirectory(path) => write!(f, "target directory {} does not exist", path.display()),
      Self::ReadDirectory { path, source } => {
        write!(f, "cannot read target directory {}: {}", path.display(), source)
      }
      Self::NoImages(path) => write!(f, "no usable PNG images in {}", path.display()),
      Self::Decode { path, reason } => write!(f, "cannot decode {}: {}", path.display(), reason),
      Self::EmptyImage(path) => write!(f, "{} has no opaque pixels", path.display()),
    }
  }
}

impl std::error::Error for TargetLoadError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::ReadDirectory { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// Decoded target images available for spawning.
#[derive(Resource, Clone, Debug, Default)]
pub struct TargetLibrary {
  entries: Vec<(String, Raster)>,
}

impl TargetLibrary {
  /// Builds a library from already-decoded rasters. Fully transparent ones
  /// are dropped.
  pub fn new(entries: impl IntoIterator<Item = (String, Raster)>) -> Self {
    Self {
      entries: entries
        .into_iter()
        .filter(|(_, raster)| raster.opaque_bounds().is_some())
        .collect(),
    }
  }

  /// Decodes every `*.png` in `dir`, scaled by `scale`.
  ///
  /// Individual files that fail to decode are logged and skipped; the call
  /// only fails when the directory is unreadable or nothing usable remains.
  pub fn load_dir(dir: impl AsRef<Path>, scale: f32) -> Result<Self, TargetLoadError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
      return Err(TargetLoadError::MissingDirectory(dir.to_path_buf()));
    }

    let read_error = |source| TargetLoadError::ReadDirectory {
      path: dir.to_path_buf(),
      source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
      let path = entry.map_err(read_error)?.path();
      let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
      if is_png {
        paths.push(path);
      }
    }
    paths.sort();

    let mut entries = Vec::new();
    for path in paths {
      match load_png(&path, scale) {
        Ok(raster) => {
          let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
          entries.push((name, raster));
        }
        Err(e) => warn!("Skipping target image: {}", e),
      }
    }

    if entries.is_empty() {
      return Err(TargetLoadError::NoImages(dir.to_path_buf()));
    }

    Ok(Self { entries })
  }

  /// Like [`load_dir`](Self::load_dir), but logs the failure and returns an
  /// empty library that always yields the fallback hexagon.
  pub fn load_dir_or_fallback(dir: impl AsRef<Path>, scale: f32) -> Self {
    Self::load_dir(dir, scale).unwrap_or_else(|e| {
      warn!("{}; using procedural {} target", e, FALLBACK_NAME);
      Self::default()
    })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(name, _)| name.as_str())
  }

  /// Builds a sprite from a random entry, centered on the playfield's target
  /// position. Falls back to the hexagon when the library is empty.
  pub fn next_sprite(&self, rng: &mut impl Rng, settings: &ShatterSettings) -> TargetSprite {
    let playfield = &settings.playfield;
    let tolerance = settings.fragment.simplify_tolerance;

    let picked = self
      .entries
      .choose(rng)
      .and_then(|(name, raster)| TargetSprite::new(name.clone(), raster, playfield.target_center(), tolerance));

    picked.unwrap_or_else(|| fallback_sprite(playfield, settings.target.hexagon_radius, tolerance))
  }
}

/// Decodes one PNG file into a scaled raster.
pub fn load_png(path: &Path, scale: f32) -> Result<Raster, TargetLoadError> {
  let bytes = std::fs::read(path).map_err(|e| TargetLoadError::Decode {
    path: path.to_path_buf(),
    reason: e.to_string(),
  })?;
  let raster = decode_png(&bytes, scale).map_err(|reason| TargetLoadError::Decode {
    path: path.to_path_buf(),
    reason,
  })?;
  if raster.opaque_bounds().is_none() {
    return Err(TargetLoadError::EmptyImage(path.to_path_buf()));
  }
  Ok(raster)
}

/// Decodes PNG bytes into an RGBA raster scaled with nearest-neighbor
/// sampling.
pub fn decode_png(bytes: &[u8], scale: f32) -> Result<Raster, String> {
  let image = Image::from_buffer(
    bytes,
    ImageType::Extension("png"),
    CompressedImageFormats::NONE,
    true,
    ImageSampler::Default,
    RenderAssetUsages::default(),
  )
  .map_err(|e| e.to_string())?;

  let raster = raster_from_image(&image).ok_or_else(|| "unsupported pixel format".to_string())?;
  if (scale - 1.0).abs() > f32::EPSILON && scale > 0.0 {
    Ok(raster.scaled(scale))
  } else {
    Ok(raster)
  }
}

/// Corners of a pointy-top regular hexagon inscribed in a `2r x 2r` box.
pub fn hexagon_points(radius: f32) -> [Vec2; 6] {
  std::array::from_fn(|i| {
    let angle = i as f32 * FRAC_PI_3 - FRAC_PI_2;
    Vec2::new(radius + radius * angle.cos(), radius + radius * angle.sin())
  })
}

/// Solid hexagon raster; a pixel is filled when its center lies inside.
pub fn hexagon_raster(radius: f32, color: Rgba) -> Raster {
  let side = (radius * 2.0).ceil().max(1.0) as u32;
  let corners = hexagon_points(radius);
  let mut raster = Raster::new(side, side);

  for y in 0..side {
    for x in 0..side {
      let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
      if inside_convex(&corners, p) {
        raster.set(x, y, color);
      }
    }
  }
  raster
}

fn inside_convex(corners: &[Vec2], p: Vec2) -> bool {
  let n = corners.len();
  (0..n).all(|i| {
    let a = corners[i];
    let b = corners[(i + 1) % n];
    (b - a).perp_dot(p - a) >= 0.0
  })
}

/// The hexagon target used when no image is available.
pub fn fallback_sprite(playfield: &Playfield, radius: f32, tolerance: f32) -> TargetSprite {
  let center = playfield.target_center();
  let raster = hexagon_raster(radius, Rgba::RED);
  TargetSprite::new(FALLBACK_NAME, &raster, center, tolerance)
    .unwrap_or_else(|| TargetSprite::single_pixel(FALLBACK_NAME, Rgba::RED, center))
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  use super::*;

  fn encode_png(raster: &Raster) -> Vec<u8> {
    let bytes = raster.as_slice().iter().flat_map(|p| p.to_array()).collect();
    let image = image::RgbaImage::from_raw(raster.width(), raster.height(), bytes).unwrap();
    let mut out = std::io::Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
  }

  #[test]
  fn hexagon_is_pointy_top_and_solid() {
    let raster = hexagon_raster(50.0, Rgba::RED);
    assert_eq!((raster.width(), raster.height()), (100, 100));
    // Center filled, corners empty
    assert_eq!(raster[(50, 50)], Rgba::RED);
    assert_eq!(raster[(0, 0)], Rgba::TRANSPARENT);
    assert_eq!(raster[(99, 0)], Rgba::TRANSPARENT);
    // Top vertex sits at the middle of the top edge
    assert_eq!(raster[(50, 1)], Rgba::RED);
    assert_eq!(raster[(10, 50)], Rgba::RED);
  }

  #[test]
  fn hexagon_corners_match_layout() {
    let points = hexagon_points(50.0);
    assert!((points[0] - Vec2::new(50.0, 0.0)).length() < 1e-4);
    assert!((points[3] - Vec2::new(50.0, 100.0)).length() < 1e-4);
  }

  #[test]
  fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
      TargetLibrary::load_dir(&missing, 0.5),
      Err(TargetLoadError::MissingDirectory(_))
    ));
    assert!(TargetLibrary::load_dir_or_fallback(&missing, 0.5).is_empty());
  }

  #[test]
  fn directory_without_pngs_has_no_images() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not an image").unwrap();
    assert!(matches!(
      TargetLibrary::load_dir(dir.path(), 0.5),
      Err(TargetLoadError::NoImages(_))
    ));
  }

  #[test]
  fn corrupt_png_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"definitely not png").unwrap();
    let raster = Raster::filled(20, 10, Rgba::rgb(0, 128, 255));
    std::fs::write(dir.path().join("block.png"), encode_png(&raster)).unwrap();

    let library = TargetLibrary::load_dir(dir.path(), 0.5).unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.names().collect::<Vec<_>>(), vec!["block"]);
  }

  #[test]
  fn loaded_images_are_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let raster = Raster::filled(40, 20, Rgba::rgb(0, 128, 255));
    std::fs::write(dir.path().join("block.png"), encode_png(&raster)).unwrap();

    let library = TargetLibrary::load_dir(dir.path(), 0.5).unwrap();
    let sprite = library.next_sprite(&mut StdRng::seed_from_u64(1), &ShatterSettings::default());
    assert_eq!(sprite.name(), "block");
    assert_eq!(sprite.size(), Vec2::new(20.0, 10.0));
  }

  #[test]
  fn empty_library_yields_hexagon() {
    let settings = ShatterSettings::default();
    let sprite = TargetLibrary::default().next_sprite(&mut StdRng::seed_from_u64(0), &settings);
    assert_eq!(sprite.name(), FALLBACK_NAME);
    assert_eq!(sprite.center(), settings.playfield.target_center());
    assert!(sprite.polygon().len() >= 3);
  }

  #[test]
  fn transparent_entries_are_dropped() {
    let library = TargetLibrary::new([
      ("clear".to_string(), Raster::new(4, 4)),
      ("solid".to_string(), Raster::filled(4, 4, Rgba::RED)),
    ]);
    assert_eq!(library.names().collect::<Vec<_>>(), vec!["solid"]);
  }

  #[test]
  fn selection_covers_all_entries() {
    let library = TargetLibrary::new(
      ["a", "b", "c"]
        .into_iter()
        .map(|n| (n.to_string(), Raster::filled(4, 4, Rgba::RED))),
    );
    let settings = ShatterSettings::default();
    let mut rng = StdRng::seed_from_u64(5);
    let mut seen: Vec<String> = (0..64)
      .map(|_| library.next_sprite(&mut rng, &settings).name().to_string())
      .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen, vec!["a", "b", "c"]);
  }
}
