//! The shatterable target.
//!
//! # State machine
//!
//! ```text
//!            projectile contact
//!   Intact ----------------------> Shattered
//!     ^                                |
//!     +------- now >= respawn_at ------+
//! ```
//!
//! Shattering runs region extraction over the intact raster and produces one
//! [`FragmentBody`] per region. The previous fragment set is discarded when
//! the target respawns.

mod library;
mod sprite;

use std::time::Duration;

use bevy::prelude::*;
pub use library::{
  FALLBACK_NAME, TargetLibrary, TargetLoadError, decode_png, fallback_sprite, hexagon_points,
  hexagon_raster, load_png,
};
use rand::Rng;
pub use sprite::TargetSprite;

use crate::fragment::FragmentBody;
use crate::settings::FragmentSettings;
use crate::shatter::extract_regions;

/// Time between shattering and the next intact target.
pub const RESPAWN_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetState {
  /// `body` is the static collider entity once it has been spawned.
  Intact { body: Option<Entity> },
  /// Fragment entities adopted after the shatter, and when to respawn.
  Shattered {
    fragments: Vec<Entity>,
    respawn_at: Duration,
  },
}

/// Result of a successful shatter.
#[derive(Debug)]
pub struct ShatterOutcome {
  pub fragments: Vec<FragmentBody>,
  /// Static body that must be removed from the world.
  pub removed_body: Option<Entity>,
}

#[derive(Clone, Debug)]
pub struct TargetEntity {
  sprite: TargetSprite,
  state: TargetState,
  respawn_delay: Duration,
}

impl TargetEntity {
  pub fn new(sprite: TargetSprite) -> Self {
    Self {
      sprite,
      state: TargetState::Intact { body: None },
      respawn_delay: RESPAWN_DELAY,
    }
  }

  pub fn with_respawn_delay(mut self, delay: Duration) -> Self {
    self.respawn_delay = delay;
    self
  }

  /// Applies to the next shatter; a pending respawn keeps its time.
  pub fn set_respawn_delay(&mut self, delay: Duration) {
    self.respawn_delay = delay;
  }

  pub fn sprite(&self) -> &TargetSprite {
    &self.sprite
  }

  pub fn state(&self) -> &TargetState {
    &self.state
  }

  pub fn is_shattered(&self) -> bool {
    matches!(self.state, TargetState::Shattered { .. })
  }

  /// Static body of the intact target, if spawned.
  pub fn body(&self) -> Option<Entity> {
    match self.state {
      TargetState::Intact { body } => body,
      TargetState::Shattered { .. } => None,
    }
  }

  pub fn respawn_at(&self) -> Option<Duration> {
    match self.state {
      TargetState::Shattered { respawn_at, .. } => Some(respawn_at),
      TargetState::Intact { .. } => None,
    }
  }

  /// Fragment entities owned by the current shatter.
  pub fn fragments(&self) -> &[Entity] {
    match &self.state {
      TargetState::Shattered { fragments, .. } => fragments,
      TargetState::Intact { .. } => &[],
    }
  }

  /// Records the static body spawned for the intact sprite.
  ///
  /// Returns `false` (and records nothing) while shattered.
  pub fn attach_body(&mut self, entity: Entity) -> bool {
    match &mut self.state {
      TargetState::Intact { body } => {
        *body = Some(entity);
        true
      }
      TargetState::Shattered { .. } => false,
    }
  }

  /// Breaks the intact target into fragments.
  ///
  /// Returns `None` if already shattered, so repeated contacts in one frame
  /// produce a single fragment set.
  pub fn shatter(
    &mut self,
    now: Duration,
    settings: &FragmentSettings,
    rng: &mut impl Rng,
  ) -> Option<ShatterOutcome> {
    let TargetState::Intact { body } = self.state else {
      return None;
    };

    let origin = self.sprite.origin();
    let fragments = extract_regions(self.sprite.raster(), settings.min_region_size)
      .into_iter()
      .map(|region| {
        FragmentBody::with_settings(
          origin + region.centroid_offset,
          region.color,
          region.mask,
          region.bounds,
          settings,
          rng,
        )
      })
      .collect();

    self.state = TargetState::Shattered {
      fragments: Vec::new(),
      respawn_at: now + self.respawn_delay,
    };

    Some(ShatterOutcome {
      fragments,
      removed_body: body,
    })
  }

  /// Takes ownership of spawned fragment entities.
  pub fn adopt_fragments(&mut self, entities: impl IntoIterator<Item = Entity>) {
    if let TargetState::Shattered { fragments, .. } = &mut self.state {
      fragments.extend(entities);
    }
  }

  /// Drops a fragment from the owned set. Returns `false` if it was not
  /// owned, so removing twice is harmless.
  pub fn forget_fragment(&mut self, entity: Entity) -> bool {
    let TargetState::Shattered { fragments, .. } = &mut self.state else {
      return false;
    };
    match fragments.iter().position(|&e| e == entity) {
      Some(i) => {
        fragments.swap_remove(i);
        true
      }
      None => false,
    }
  }

  pub fn should_respawn(&self, now: Duration) -> bool {
    self.respawn_at().is_some_and(|at| now >= at)
  }

  /// Returns to `Intact` with a new sprite.
  ///
  /// Yields the fragments of the previous shatter so the caller can remove
  /// their bodies, plus the old static body if the target was still intact.
  pub fn respawn(&mut self, sprite: TargetSprite) -> Vec<Entity> {
    let previous = std::mem::replace(&mut self.state, TargetState::Intact { body: None });
    self.sprite = sprite;
    match previous {
      TargetState::Shattered { fragments, .. } => fragments,
      TargetState::Intact { body } => body.into_iter().collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  use super::*;
  use crate::playfield::Playfield;
  use crate::primitives::Raster;
  use crate::render::Rgba;

  fn two_tone_target() -> TargetEntity {
    let mut raster = Raster::filled(20, 10, Rgba::RED);
    for x in 10..20 {
      for y in 0..10 {
        raster.set(x, y, Rgba::rgb(0, 0, 255));
      }
    }
    // A speck too small to survive
    raster.set(0, 0, Rgba::rgb(0, 255, 0));
    let sprite = TargetSprite::new("two-tone", &raster, Vec2::new(600.0, 350.0), 1.0).unwrap();
    TargetEntity::new(sprite)
  }

  fn entities(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
  }

  #[test]
  fn shatter_produces_fragments_once() {
    let body = entities(1)[0];
    let mut target = two_tone_target();
    target.attach_body(body);
    let mut rng = StdRng::seed_from_u64(0);
    let settings = FragmentSettings::default();

    let outcome = target.shatter(Duration::ZERO, &settings, &mut rng).unwrap();
    assert_eq!(outcome.fragments.len(), 2);
    assert_eq!(outcome.removed_body, Some(body));
    assert!(target.is_shattered());
    assert_eq!(target.body(), None);

    assert!(target.shatter(Duration::ZERO, &settings, &mut rng).is_none());
    assert!(target.shatter(Duration::from_millis(5), &settings, &mut rng).is_none());
  }

  #[test]
  fn three_contacts_shatter_exactly_once() {
    let mut target = two_tone_target();
    let mut rng = StdRng::seed_from_u64(0);
    let settings = FragmentSettings::default();
    let shattered = (0..3)
      .filter_map(|_| target.shatter(Duration::from_secs(2), &settings, &mut rng))
      .count();
    assert_eq!(shattered, 1);
  }

  #[test]
  fn fragment_positions_follow_sprite_origin() {
    let mut target = two_tone_target();
    let outcome = target
      .shatter(Duration::ZERO, &FragmentSettings::default(), &mut StdRng::seed_from_u64(3))
      .unwrap();

    // Sprite 20x10 centered at (600, 350): origin (590, 345)
    let mut positions: Vec<Vec2> = outcome.fragments.iter().map(|f| f.spawn_position()).collect();
    positions.sort_by(|a, b| a.x.total_cmp(&b.x));
    assert_eq!(positions, vec![Vec2::new(595.0, 350.0), Vec2::new(605.0, 350.0)]);
  }

  #[test]
  fn respawn_timing_is_inclusive() {
    let mut target = two_tone_target();
    let t0 = Duration::from_secs(10);
    target
      .shatter(t0, &FragmentSettings::default(), &mut StdRng::seed_from_u64(0))
      .unwrap();

    assert!(!target.should_respawn(t0 + Duration::from_millis(999)));
    assert!(target.should_respawn(t0 + Duration::from_millis(1000)));
    assert!(target.should_respawn(t0 + Duration::from_millis(5000)));
  }

  #[test]
  fn intact_target_never_respawns() {
    let target = two_tone_target();
    assert!(!target.should_respawn(Duration::from_secs(1000)));
  }

  #[test]
  fn respawn_hands_back_fragments() {
    let mut target = two_tone_target();
    target
      .shatter(Duration::ZERO, &FragmentSettings::default(), &mut StdRng::seed_from_u64(0))
      .unwrap();
    let e = entities(3);
    target.adopt_fragments(e.clone());
    assert!(target.forget_fragment(e[1]));
    assert!(!target.forget_fragment(e[1]));

    let sprite = fallback_sprite(&Playfield::default(), 50.0, 1.0);
    let mut discarded = target.respawn(sprite);
    discarded.sort();
    assert_eq!(discarded, vec![e[0], e[2]]);
    assert!(!target.is_shattered());
    assert_eq!(target.sprite().name(), FALLBACK_NAME);
    assert!(target.fragments().is_empty());
  }

  #[test]
  fn attach_body_is_ignored_while_shattered() {
    let mut target = two_tone_target();
    target
      .shatter(Duration::ZERO, &FragmentSettings::default(), &mut StdRng::seed_from_u64(0))
      .unwrap();
    assert!(!target.attach_body(entities(1)[0]));
  }

  #[test]
  fn hexagon_shatters_into_one_fragment() {
    let sprite = fallback_sprite(&Playfield::default(), 50.0, 1.0);
    let mut target = TargetEntity::new(sprite);
    let outcome = target
      .shatter(Duration::ZERO, &FragmentSettings::default(), &mut StdRng::seed_from_u64(0))
      .unwrap();
    assert_eq!(outcome.fragments.len(), 1);
    assert!(outcome.fragments[0].polygon().len() >= 3);
  }
}
