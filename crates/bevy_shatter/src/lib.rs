//! Shatter - a cannon range where pixel-art targets break into rigid-body
//! fragments.
//!
//! The core pipeline turns a target raster into physics bodies:
//! connected same-color regions are flood-filled out of the image, each
//! region's pixels are reduced to a collision polygon with
//! Ramer-Douglas-Peucker, and the result is spawned as a dynamic rapier body.
//! [`SimulationWorld`] tracks every body it creates so they can be pruned or
//! discarded when the target respawns.

pub mod cannon;
pub mod collision;
pub mod fragment;
pub mod playfield;
pub mod primitives;
pub mod projectile;
pub mod render;
pub mod settings;
pub mod shatter;
pub mod target;
pub mod world;

pub use cannon::{Cannon, CannonControl};
pub use collision::{CollisionPolygon, CollisionTag, simplify};
pub use fragment::{FragmentBody, FragmentLaunch, FragmentSnapshot};
pub use playfield::Playfield;
pub use primitives::{BoundingBox, PixelMask, Raster, Surface};
pub use projectile::ProjectileEntity;
pub use render::{Rgba, mask_image, raster_image};
pub use settings::ShatterSettings;
pub use shatter::{DEFAULT_MIN_REGION_SIZE, ExtractedRegion, extract_regions};
pub use target::{
  RESPAWN_DELAY, ShatterOutcome, TargetEntity, TargetLibrary, TargetLoadError, TargetSprite,
  TargetState,
};
pub use world::{
  CannonPose, Floor, FloorView, ProjectileView, RenderSnapshot, ShatterPlugin, ShatterRng,
  ShatterSet, SimulationStats, SimulationWorld, TargetRespawned, TargetShattered, TargetView,
};
