//! The title screen, shown on launch and after quitting a run.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::Screen;
use crate::game::Session;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Title), spawn_title_screen);
    app.add_systems(
        Update,
        start_game.run_if(in_state(Screen::Title).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_title_screen(mut commands: Commands) {
    commands.spawn((
        Name::new("Title Text"),
        Text2d::new("Bubble Buster"),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.15)),
        Transform::from_xyz(0.0, 80.0, 0.0),
        DespawnOnExit(Screen::Title),
    ));
    commands.spawn((
        Name::new("Title Prompt"),
        Text2d::new("Press Enter to play"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, -40.0, 0.0),
        DespawnOnExit(Screen::Title),
    ));
}

fn start_game(mut session: ResMut<Session>, mut next_screen: ResMut<NextState<Screen>>) {
    session.restart();
    next_screen.set(Screen::Instructions);
}
