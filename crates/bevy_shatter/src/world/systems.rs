//! Systems that drive [`SimulationWorld`] around the physics step.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::{
  CannonPose, Floor, FloorView, ProjectileView, RenderSnapshot, ShatterRng, SimulationWorld,
  TargetRespawned, TargetShattered, TargetView,
};
use crate::cannon::CannonControl;
use crate::collision::CollisionTag;
use crate::fragment::FragmentBody;
use crate::projectile::ProjectileEntity;
use crate::settings::ShatterSettings;
use crate::target::{TargetLibrary, TargetState};

/// Spawns the static floor along the bottom of the playfield.
pub fn spawn_floor(mut commands: Commands, world: Res<SimulationWorld>) {
  let settings = world.settings();
  let playfield = &settings.playfield;
  let (center, size) = playfield.floor_rect();

  commands.spawn((
    Floor,
    CollisionTag::Floor,
    RigidBody::Fixed,
    Collider::cuboid(size.x / 2.0, size.y / 2.0),
    Friction::coefficient(settings.physics.floor_friction),
    Transform::from_translation(playfield.to_world(center).extend(0.0)),
  ));
}

/// Keeps rapier's gravity in line with the configured value.
pub fn sync_gravity(world: Res<SimulationWorld>, mut configs: Query<&mut RapierConfiguration>) {
  let gravity = Vec2::new(0.0, -world.settings().physics.gravity);
  for mut config in &mut configs {
    if config.gravity != gravity {
      config.gravity = gravity;
    }
  }
}

/// Pushes hot-reloaded tunables into the world and the floor collider.
pub fn sync_settings(
  settings: Res<ShatterSettings>,
  mut world: ResMut<SimulationWorld>,
  mut floors: Query<&mut Friction, With<Floor>>,
) {
  if settings.is_changed() && world.settings() != &*settings {
    world.apply_settings(settings.clone());
    let friction = world.settings().physics.floor_friction;
    for mut floor in &mut floors {
      if floor.coefficient != friction {
        floor.coefficient = friction;
      }
    }
    debug!("Simulation settings updated");
  }
}

/// Applies cannon intent and fires when requested.
pub fn steer_cannon(
  mut commands: Commands,
  mut control: ResMut<CannonControl>,
  mut world: ResMut<SimulationWorld>,
) {
  world.steer(&control);
  if control.take_fire() {
    let entity = world.fire(&mut commands);
    debug!("Fired projectile {:?} at {:.0}°", entity, world.cannon().angle());
  }
}

/// Replaces a shattered target once its delay has elapsed.
pub fn respawn_target(
  mut commands: Commands,
  time: Res<Time>,
  library: Res<TargetLibrary>,
  mut rng: ResMut<ShatterRng>,
  mut world: ResMut<SimulationWorld>,
  mut respawned: MessageWriter<TargetRespawned>,
) {
  if !world.target().should_respawn(time.elapsed()) {
    return;
  }

  let sprite = library.next_sprite(&mut rng.0, world.settings());
  let name = sprite.name().to_string();
  let discarded = world.respawn_target(sprite);
  for entity in &discarded {
    commands.entity(*entity).try_despawn();
  }

  info!("Target respawned as {} ({} fragments cleared)", name, discarded.len());
  respawned.write(TargetRespawned { name });
}

/// Gives an intact target without a body its static collider.
pub fn spawn_target_body(mut commands: Commands, mut world: ResMut<SimulationWorld>) {
  if !matches!(world.target().state(), TargetState::Intact { body: None }) {
    return;
  }

  let bundle = world
    .target()
    .sprite()
    .physics_bundle(&world.settings().playfield);
  let entity = commands.spawn(bundle).id();
  world.attach_target_body(entity);
}

/// Shatters the target on the first projectile contact.
///
/// Later contacts in the same tick find the target already shattered.
pub fn handle_projectile_hits(
  mut commands: Commands,
  mut collisions: MessageReader<CollisionEvent>,
  tags: Query<&CollisionTag>,
  time: Res<Time>,
  mut rng: ResMut<ShatterRng>,
  mut world: ResMut<SimulationWorld>,
  mut shattered: MessageWriter<TargetShattered>,
) {
  for event in collisions.read() {
    let CollisionEvent::Started(a, b, _) = event else {
      continue;
    };
    let (Ok(&tag_a), Ok(&tag_b)) = (tags.get(*a), tags.get(*b)) else {
      continue;
    };
    if !CollisionTag::is_projectile_hit(tag_a, tag_b) {
      continue;
    }

    let Some(outcome) = world.on_projectile_hit(time.elapsed(), &mut rng.0) else {
      continue;
    };

    if let Some(body) = outcome.removed_body {
      commands.entity(body).try_despawn();
    }

    let playfield = world.settings().playfield;
    let spawned: Vec<Entity> = outcome
      .fragments
      .into_iter()
      .map(|fragment| commands.spawn((fragment.physics_bundle(&playfield), fragment)).id())
      .collect();

    let center = world.target().sprite().center();
    info!("Target shattered into {} fragments", spawned.len());
    shattered.write(TargetShattered {
      fragments: spawned.len(),
      center,
    });
    world.adopt_fragments(spawned);
  }
}

/// Removes projectiles that left the field or came to rest.
pub fn prune_projectiles(
  mut commands: Commands,
  mut world: ResMut<SimulationWorld>,
  projectiles: Query<(Entity, &ProjectileEntity, &Transform, &Velocity)>,
) {
  let playfield = world.settings().playfield;
  let expired: Vec<Entity> = projectiles
    .iter()
    .filter(|(_, projectile, transform, velocity)| {
      let position = playfield.to_screen(transform.translation.truncate());
      let velocity = playfield.vector_to_screen(velocity.linvel);
      projectile.should_remove(position, velocity, &playfield)
    })
    .map(|(entity, ..)| entity)
    .collect();

  for entity in expired {
    if world.release_projectile(entity) {
      commands.entity(entity).try_despawn();
    }
  }
}

/// Removes fragments that fell out of the playfield.
pub fn prune_fragments(
  mut commands: Commands,
  mut world: ResMut<SimulationWorld>,
  fragments: Query<(Entity, &FragmentBody, &Transform)>,
) {
  let playfield = world.settings().playfield;
  let expired: Vec<Entity> = fragments
    .iter()
    .filter(|(_, fragment, transform)| {
      let position = playfield.to_screen(transform.translation.truncate());
      fragment.should_remove(position, &playfield)
    })
    .map(|(entity, ..)| entity)
    .collect();

  for entity in expired {
    if world.release_fragment(entity) {
      commands.entity(entity).try_despawn();
    }
  }
}

/// Captures the current frame for renderers.
pub fn update_render_snapshot(
  world: Res<SimulationWorld>,
  fragments: Query<(&FragmentBody, &Transform)>,
  projectiles: Query<(&ProjectileEntity, &Transform)>,
  mut snapshot: ResMut<RenderSnapshot>,
) {
  let settings = world.settings();
  let playfield = settings.playfield;
  let (floor_center, floor_size) = playfield.floor_rect();
  let cannon = world.cannon();
  let target = world.target();

  let target_view = match target.state() {
    TargetState::Intact { .. } => TargetView::Intact {
      name: target.sprite().name().to_string(),
      origin: target.sprite().origin(),
      size: target.sprite().size(),
    },
    TargetState::Shattered { fragments: owned, .. } => TargetView::Shattered {
      fragments: owned
        .iter()
        .filter_map(|&entity| fragments.get(entity).ok())
        .map(|(fragment, transform)| {
          let (_, _, angle) = transform.rotation.to_euler(EulerRot::XYZ);
          fragment.render(
            playfield.to_screen(transform.translation.truncate()),
            playfield.angle_to_screen(angle),
          )
        })
        .collect(),
    },
  };

  *snapshot = RenderSnapshot {
    floor: FloorView {
      center: floor_center,
      size: floor_size,
    },
    cannon: CannonPose {
      base: cannon.base(),
      angle: cannon.angle(),
      length: cannon.settings().length,
      width: cannon.settings().width,
    },
    target: Some(target_view),
    projectiles: world
      .projectiles()
      .iter()
      .filter_map(|&entity| projectiles.get(entity).ok())
      .map(|(projectile, transform)| ProjectileView {
        position: playfield.to_screen(transform.translation.truncate()),
        radius: projectile.radius,
        color: projectile.color,
      })
      .collect(),
  };
}
