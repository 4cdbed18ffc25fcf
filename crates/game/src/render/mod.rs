//! Sprites for simulation entities.
//!
//! The library spawns bare physics bodies; this module dresses each one as it
//! appears. Bodies carry their own transforms, so only the cannon needs a
//! per-frame sync.

use bevy::prelude::*;
use bevy_shatter::{
  CollisionTag, Floor, FragmentBody, ProjectileEntity, RenderSnapshot, SimulationWorld,
  mask_image, raster_image,
};

const FLOOR_COLOR: Color = Color::srgb(0.35, 0.35, 0.35);
const CANNON_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);

/// Marker for the barrel sprite.
#[derive(Component)]
pub struct CannonSprite;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Startup, spawn_cannon_sprite).add_systems(
      Update,
      (
        dress_floor,
        dress_target,
        dress_fragments,
        dress_projectiles,
        sync_cannon_sprite,
      ),
    );
  }
}

fn spawn_cannon_sprite(mut commands: Commands) {
  commands.spawn((
    CannonSprite,
    Sprite {
      color: CANNON_COLOR,
      custom_size: Some(Vec2::ONE),
      ..default()
    },
    // Pivot at the breech
    bevy::sprite::Anchor(Vec2::new(-0.5, 0.0)),
    Transform::from_xyz(0.0, 0.0, 10.0),
  ));
}

fn dress_floor(
  mut commands: Commands,
  floors: Query<Entity, Added<Floor>>,
  snapshot: Res<RenderSnapshot>,
  world: Res<SimulationWorld>,
) {
  for entity in &floors {
    // The snapshot may not be filled yet on the first frame
    let size = if snapshot.floor.size == Vec2::ZERO {
      world.settings().playfield.floor_rect().1
    } else {
      snapshot.floor.size
    };
    commands.entity(entity).insert(Sprite {
      color: FLOOR_COLOR,
      custom_size: Some(size),
      ..default()
    });
  }
}

fn dress_target(
  mut commands: Commands,
  bodies: Query<(Entity, &CollisionTag), Added<CollisionTag>>,
  world: Res<SimulationWorld>,
  mut images: ResMut<Assets<Image>>,
) {
  for (entity, tag) in &bodies {
    if *tag != CollisionTag::Target {
      continue;
    }
    let sprite = world.target().sprite();
    debug!("Dressing target {} ({:?})", sprite.name(), sprite.size());
    let image = images.add(raster_image(sprite.raster()));
    commands.entity(entity).insert(Sprite::from_image(image));
  }
}

fn dress_fragments(
  mut commands: Commands,
  fragments: Query<(Entity, &FragmentBody), Added<FragmentBody>>,
  mut images: ResMut<Assets<Image>>,
) {
  for (entity, fragment) in &fragments {
    let image = images.add(mask_image(fragment.mask(), fragment.color()));
    commands.entity(entity).insert(Sprite::from_image(image));
  }
}

fn dress_projectiles(
  mut commands: Commands,
  projectiles: Query<(Entity, &ProjectileEntity), Added<ProjectileEntity>>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<ColorMaterial>>,
) {
  for (entity, projectile) in &projectiles {
    commands.entity(entity).insert((
      Mesh2d(meshes.add(Circle::new(projectile.radius))),
      MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::from(
        projectile.color,
      )))),
    ));
  }
}

fn sync_cannon_sprite(
  snapshot: Res<RenderSnapshot>,
  world: Res<SimulationWorld>,
  mut cannons: Query<(&mut Transform, &mut Sprite), With<CannonSprite>>,
) {
  let playfield = world.settings().playfield;
  let pose = snapshot.cannon;
  for (mut transform, mut sprite) in &mut cannons {
    let base = playfield.to_world(pose.base);
    transform.translation = base.extend(transform.translation.z);
    transform.rotation =
      Quat::from_rotation_z(playfield.angle_to_world(pose.angle.to_radians()));
    sprite.custom_size = Some(Vec2::new(pose.length, pose.width));
  }
}
