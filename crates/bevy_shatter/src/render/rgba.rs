//! RGBA pixel type.

/// RGBA pixel with 8 bits per channel.
///
/// Two pixels belong to the same region only if all four channels match.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  /// Creates a new RGBA pixel.
  #[inline]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// Creates an opaque RGB pixel (alpha = 255).
  #[inline]
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 255 }
  }

  /// Transparent black.
  pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

  /// Opaque red.
  pub const RED: Self = Self::rgb(255, 0, 0);

  /// Any pixel with non-zero alpha counts as part of the sprite.
  #[inline]
  pub fn is_opaque(&self) -> bool {
    self.a != 0
  }

  #[inline]
  pub const fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }
}

impl From<Rgba> for bevy::color::Color {
  fn from(c: Rgba) -> Self {
    bevy::color::Color::srgba_u8(c.r, c.g, c.b, c.a)
  }
}
