//! Simulation bookkeeping.
//!
//! [`SimulationWorld`] owns the cannon, the target and the list of live
//! projectiles. It is the single place that decides which bodies exist:
//! every body it spawns is registered here and removal goes through a
//! presence check, so removing twice is a no-op.
//!
//! One fixed tick runs, in order: steer and fire, respawn, physics step,
//! collision reaction (shatter), pruning. See [`ShatterSet`].

mod plugin;
mod systems;

use std::time::Duration;

use bevy::prelude::*;
pub use plugin::{ShatterPlugin, ShatterSet};
use rand::SeedableRng;
use rand::rngs::StdRng;
pub use systems::{
  handle_projectile_hits, prune_fragments, prune_projectiles, respawn_target, spawn_floor,
  spawn_target_body, steer_cannon, sync_gravity, sync_settings, update_render_snapshot,
};

use crate::cannon::{Cannon, CannonControl};
use crate::fragment::FragmentSnapshot;
use crate::projectile::projectile_bundle;
use crate::render::Rgba;
use crate::settings::ShatterSettings;
use crate::target::{ShatterOutcome, TargetEntity, TargetSprite};

/// Random source for fragment launches and target selection.
///
/// Seeded from the OS by default; tests insert [`ShatterRng::seeded`].
#[derive(Resource)]
pub struct ShatterRng(pub StdRng);

impl ShatterRng {
  pub fn seeded(seed: u64) -> Self {
    Self(StdRng::seed_from_u64(seed))
  }
}

impl Default for ShatterRng {
  fn default() -> Self {
    Self(StdRng::from_os_rng())
  }
}

/// Marker for the static floor body.
#[derive(Component)]
pub struct Floor;

/// Emitted after the target breaks apart.
#[derive(Message, Clone, Debug)]
pub struct TargetShattered {
  pub fragments: usize,
  /// Screen-space center of the broken sprite.
  pub center: Vec2,
}

/// Emitted after a new intact target is placed.
#[derive(Message, Clone, Debug)]
pub struct TargetRespawned {
  pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationStats {
  pub shots: u32,
  pub shatters: u32,
  pub respawns: u32,
}

#[derive(Resource)]
pub struct SimulationWorld {
  settings: ShatterSettings,
  cannon: Cannon,
  target: TargetEntity,
  projectiles: Vec<Entity>,
  stats: SimulationStats,
}

impl SimulationWorld {
  pub fn new(settings: ShatterSettings, sprite: TargetSprite) -> Self {
    let cannon = Cannon::new(settings.cannon.clone(), &settings.playfield);
    let target = TargetEntity::new(sprite)
      .with_respawn_delay(Duration::from_millis(settings.target.respawn_delay_ms));
    Self {
      settings,
      cannon,
      target,
      projectiles: Vec::new(),
      stats: SimulationStats::default(),
    }
  }

  pub fn settings(&self) -> &ShatterSettings {
    &self.settings
  }

  /// Replaces the tunables. Cannon pose is kept; playfield size is not
  /// hot-swappable because live bodies were placed against it.
  pub fn apply_settings(&mut self, mut settings: ShatterSettings) {
    settings.playfield = self.settings.playfield;
    self.cannon.set_settings(settings.cannon.clone(), &settings.playfield);
    self
      .target
      .set_respawn_delay(Duration::from_millis(settings.target.respawn_delay_ms));
    self.settings = settings;
  }

  pub fn cannon(&self) -> &Cannon {
    &self.cannon
  }

  pub fn target(&self) -> &TargetEntity {
    &self.target
  }

  pub fn projectiles(&self) -> &[Entity] {
    &self.projectiles
  }

  pub fn stats(&self) -> SimulationStats {
    self.stats
  }

  /// Applies one tick of cannon intent.
  pub fn steer(&mut self, control: &CannonControl) {
    if control.move_axis != 0.0 {
      self.cannon.move_by(control.move_axis.clamp(-1.0, 1.0));
    }
    if control.rotate_axis != 0.0 {
      self.cannon.rotate_by(control.rotate_axis.clamp(-1.0, 1.0));
    }
  }

  /// Spawns a projectile at the muzzle and registers it.
  pub fn fire(&mut self, commands: &mut Commands) -> Entity {
    let bundle = projectile_bundle(
      &self.settings.projectile,
      &self.settings.playfield,
      self.cannon.muzzle(),
      self.cannon.aim(),
      self.cannon.settings().force,
    );
    let entity = commands.spawn(bundle).id();
    self.projectiles.push(entity);
    self.stats.shots += 1;
    entity
  }

  /// Unregisters a projectile. Returns `false` if it was not registered.
  pub fn release_projectile(&mut self, entity: Entity) -> bool {
    match self.projectiles.iter().position(|&e| e == entity) {
      Some(i) => {
        self.projectiles.swap_remove(i);
        true
      }
      None => false,
    }
  }

  /// Unregisters a fragment owned by the current target.
  pub fn release_fragment(&mut self, entity: Entity) -> bool {
    self.target.forget_fragment(entity)
  }

  /// Reacts to a projectile touching the target.
  ///
  /// Only the first contact after the target became intact shatters it.
  pub fn on_projectile_hit(&mut self, now: Duration, rng: &mut impl rand::Rng) -> Option<ShatterOutcome> {
    let outcome = self.target.shatter(now, &self.settings.fragment, rng)?;
    self.stats.shatters += 1;
    Some(outcome)
  }

  pub fn adopt_fragments(&mut self, entities: impl IntoIterator<Item = Entity>) {
    self.target.adopt_fragments(entities);
  }

  pub fn attach_target_body(&mut self, entity: Entity) -> bool {
    self.target.attach_body(entity)
  }

  /// Puts a fresh sprite in place and returns the bodies to remove.
  pub fn respawn_target(&mut self, sprite: TargetSprite) -> Vec<Entity> {
    self.stats.respawns += 1;
    self.target.respawn(sprite)
  }
}

/// Floor rectangle in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FloorView {
  pub center: Vec2,
  pub size: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CannonPose {
  pub base: Vec2,
  /// Degrees; negative aims upward.
  pub angle: f32,
  pub length: f32,
  pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TargetView {
  Intact {
    name: String,
    origin: Vec2,
    size: Vec2,
  },
  Shattered {
    fragments: Vec<FragmentSnapshot>,
  },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileView {
  pub position: Vec2,
  pub radius: f32,
  pub color: Rgba,
}

/// Everything a renderer needs for one frame, in screen space.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct RenderSnapshot {
  pub floor: FloorView,
  pub cannon: CannonPose,
  /// `None` until the first frame is captured.
  pub target: Option<TargetView>,
  pub projectiles: Vec<ProjectileView>,
}
