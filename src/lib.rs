pub mod game;
pub mod screens;

use bevy::prelude::*;

use crate::game::config::GameConfig;

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        let config = GameConfig::default();
        if let Err(error) = config.validate() {
            // No level can be built from a bad config.
            panic!("invalid game configuration: {error}");
        }

        app.add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Bubble Buster".to_string(),
                    resolution: (config.window_width, config.window_height).into(),
                    resizable: false,
                    ..default()
                }),
                ..default()
            }),
        );

        app.insert_resource(ClearColor(game::palette::background()));
        app.insert_resource(config);

        // Set up the `Pause` state.
        app.init_state::<Pause>();
        app.configure_sets(Update, PausableSystems.run_if(in_state(Pause(false))));

        app.add_plugins((game::plugin, screens::plugin));

        app.add_systems(Startup, spawn_camera);
    }
}

/// Whether the game is paused.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Pause(pub bool);

/// A system set for systems that shouldn't run while the game is paused.
#[derive(SystemSet, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PausableSystems;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}
