use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;

use super::systems::*;
use super::{RenderSnapshot, ShatterRng, SimulationWorld, TargetRespawned, TargetShattered};
use crate::cannon::CannonControl;
use crate::settings::ShatterSettings;
use crate::target::TargetLibrary;

/// Ordering of one simulation tick.
///
/// `Steer` and `Respawn` run in `FixedUpdate`, before the physics backend
/// sync. `React` and `Prune` run in `FixedPostUpdate`, after writeback.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShatterSet {
  Steer,
  Respawn,
  React,
  Prune,
}

/// Plugin for the cannon, target and fragment lifecycle.
///
/// Expects `RapierPhysicsPlugin` configured with `in_fixed_schedule()` so the
/// physics step happens inside the fixed tick. Reads [`ShatterSettings`] and
/// [`TargetLibrary`] at startup; insert them beforehand to override the
/// defaults (an empty library spawns the fallback hexagon).
#[derive(Default)]
pub struct ShatterPlugin {
  settings: Option<ShatterSettings>,
}

impl ShatterPlugin {
  pub fn with_settings(mut self, settings: ShatterSettings) -> Self {
    self.settings = Some(settings);
    self
  }
}

impl Plugin for ShatterPlugin {
  fn build(&self, app: &mut App) {
    match &self.settings {
      Some(settings) => app.insert_resource(settings.clone()),
      None => app.init_resource::<ShatterSettings>(),
    };

    app
      .init_resource::<CannonControl>()
      .init_resource::<ShatterRng>()
      .init_resource::<TargetLibrary>()
      .init_resource::<RenderSnapshot>()
      .add_message::<TargetShattered>()
      .add_message::<TargetRespawned>();

    app.add_systems(Startup, (init_simulation_world, spawn_floor).chain());

    app.configure_sets(
      FixedUpdate,
      (ShatterSet::Steer, ShatterSet::Respawn)
        .chain()
        .before(PhysicsSet::SyncBackend),
    );
    app.configure_sets(
      FixedPostUpdate,
      (ShatterSet::React, ShatterSet::Prune)
        .chain()
        .after(PhysicsSet::Writeback),
    );

    app
      .add_systems(
        FixedUpdate,
        (sync_settings, sync_gravity, steer_cannon)
          .chain()
          .in_set(ShatterSet::Steer),
      )
      .add_systems(
        FixedUpdate,
        (respawn_target, spawn_target_body)
          .chain()
          .in_set(ShatterSet::Respawn),
      )
      .add_systems(
        FixedPostUpdate,
        handle_projectile_hits.in_set(ShatterSet::React),
      )
      .add_systems(
        FixedPostUpdate,
        (prune_projectiles, prune_fragments)
          .chain()
          .in_set(ShatterSet::Prune),
      )
      .add_systems(PostUpdate, update_render_snapshot);
  }
}

fn init_simulation_world(
  mut commands: Commands,
  settings: Res<ShatterSettings>,
  library: Res<TargetLibrary>,
  mut rng: ResMut<ShatterRng>,
) {
  let sprite = library.next_sprite(&mut rng.0, &settings);
  info!(
    "Starting simulation with target {} ({} image(s) available)",
    sprite.name(),
    library.len()
  );
  commands.insert_resource(SimulationWorld::new(settings.clone(), sprite));
}
