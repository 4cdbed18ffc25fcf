use bevy::prelude::*;
use bevy_shatter::{CollisionTag, FragmentBody, SimulationWorld};

/// Resource for frame-by-frame debug mode
#[derive(Resource, Default)]
pub struct FrameStepMode {
  pub enabled: bool,
  advance_requested: bool,
}

/// Whether collider outlines and the aim ray are drawn.
#[derive(Resource, Default)]
pub struct ShowColliders(pub bool);

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<FrameStepMode>()
      .init_resource::<ShowColliders>()
      .add_systems(PreUpdate, (frame_step_control, toggle_colliders))
      .add_systems(
        Update,
        (draw_collider_outlines, draw_aim_ray).run_if(|show: Res<ShowColliders>| show.0),
      );
  }
}

/// Controls frame-by-frame stepping mode
/// F5: Toggle frame-step mode
/// Period: Advance one frame (when in frame-step mode)
fn frame_step_control(
  keyboard: Res<ButtonInput<KeyCode>>,
  mut frame_step: ResMut<FrameStepMode>,
  mut time: ResMut<Time<Virtual>>,
) {
  if keyboard.just_pressed(KeyCode::F5) {
    frame_step.enabled = !frame_step.enabled;
    if frame_step.enabled {
      time.pause();
      info!("Frame-step mode ENABLED (press Period to advance, F5 to disable)");
    } else {
      time.unpause();
      info!("Frame-step mode DISABLED");
    }
  }

  if frame_step.enabled {
    if keyboard.just_pressed(KeyCode::Period) {
      frame_step.advance_requested = true;
      time.unpause();
    } else if frame_step.advance_requested {
      frame_step.advance_requested = false;
      time.pause();
    }
  }
}

/// F3 toggles collider outlines.
fn toggle_colliders(keyboard: Res<ButtonInput<KeyCode>>, mut show: ResMut<ShowColliders>) {
  if keyboard.just_pressed(KeyCode::F3) {
    show.0 = !show.0;
    info!("Collider outlines {}", if show.0 { "on" } else { "off" });
  }
}

/// Target outline in cyan, fragment hulls in magenta.
fn draw_collider_outlines(
  mut gizmos: Gizmos,
  world: Res<SimulationWorld>,
  bodies: Query<(&CollisionTag, &Transform)>,
  fragments: Query<(&FragmentBody, &Transform)>,
) {
  for (tag, transform) in &bodies {
    if *tag == CollisionTag::Target {
      let vertices = world.target().sprite().polygon().world_vertices();
      draw_polygon(&mut gizmos, &vertices, transform, Color::srgb(0.0, 1.0, 1.0));
    }
  }
  for (fragment, transform) in &fragments {
    let vertices = fragment.polygon().world_vertices();
    draw_polygon(&mut gizmos, &vertices, transform, Color::srgb(1.0, 0.0, 1.0));
  }
}

fn draw_polygon(gizmos: &mut Gizmos, vertices: &[Vec2], transform: &Transform, color: Color) {
  let points = vertices
    .iter()
    .map(|v| transform.transform_point(v.extend(0.0)).truncate());
  gizmos.linestrip_2d(points.clone().chain(points.take(1)), color);
}

/// Initial flight direction from the muzzle (yellow).
fn draw_aim_ray(mut gizmos: Gizmos, world: Res<SimulationWorld>) {
  const RAY_LENGTH: f32 = 150.0;

  let playfield = world.settings().playfield;
  let cannon = world.cannon();
  let muzzle = playfield.to_world(cannon.muzzle());
  let aim = playfield.vector_to_world(cannon.aim());
  gizmos.line_2d(muzzle, muzzle + aim * RAY_LENGTH, Color::srgb(1.0, 1.0, 0.0));
}
