//! The gameplay screen: pause handling and the pause overlay.
//!
//! Level setup itself lives with the session logic in the game module;
//! this file only owns what is screen-specific.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::Screen;
use crate::Pause;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        toggle_pause
            .run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::Escape))),
    );
    app.add_systems(OnEnter(Pause(true)), spawn_pause_overlay);
    app.add_systems(OnExit(Screen::Gameplay), unpause);
}

fn toggle_pause(pause: Res<State<Pause>>, mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(!pause.0));
}

fn unpause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Pause Overlay"),
        Text2d::new("Paused\nPress Escape to resume"),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.15)),
        Transform::from_xyz(0.0, 0.0, 20.0),
        DespawnOnExit(Pause(true)),
    ));
}
