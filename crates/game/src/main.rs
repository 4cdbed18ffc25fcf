mod config;
mod core;
mod input;
mod render;
#[cfg(feature = "visual_debug")]
mod visual_debug;

use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};

fn main() {
  // Window size is needed before the app exists; the config plugin re-reads
  // the file and reports errors once logging is up.
  let config = config::GameConfig::load(config::CONFIG_PATH).unwrap_or_default();

  let mut app = App::new();

  app.insert_resource(Time::<Fixed>::from_hz(60.0));

  app
    .add_plugins(
      DefaultPlugins
        .set(ImagePlugin::default_nearest())
        .set(WindowPlugin {
          primary_window: Some(Window {
            resolution: WindowResolution::new(config.window.width, config.window.height),
            title: config.window.title.clone(),
            present_mode: PresentMode::AutoVsync,
            resizable: false,
            ..default()
          }),
          ..default()
        }),
    )
    .add_plugins(config::ConfigPlugin)
    .add_plugins(core::CorePlugin)
    .add_plugins(input::InputPlugin)
    .add_plugins(render::RenderPlugin);

  #[cfg(feature = "visual_debug")]
  app.add_plugins(visual_debug::VisualDebugPlugin);

  app.run();
}
