//! The game-over screen.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::Screen;
use crate::game::Session;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::GameOver), spawn_game_over_screen);
    app.add_systems(
        Update,
        restart_run.run_if(in_state(Screen::GameOver).and(input_just_pressed(KeyCode::KeyR))),
    );
    app.add_systems(
        Update,
        quit_to_title.run_if(in_state(Screen::GameOver).and(input_just_pressed(KeyCode::KeyQ))),
    );
}

fn spawn_game_over_screen(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        Name::new("Game Over Header"),
        Text2d::new("Game Over"),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::srgb(0.6, 0.15, 0.15)),
        Transform::from_xyz(0.0, 80.0, 0.0),
        DespawnOnExit(Screen::GameOver),
    ));
    commands.spawn((
        Name::new("Game Over Score"),
        Text2d::new(format!(
            "You reached level {}\nFinal score: {}",
            session.level, session.score
        )),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, 0.0, 0.0),
        DespawnOnExit(Screen::GameOver),
    ));
    commands.spawn((
        Name::new("Game Over Prompt"),
        Text2d::new("R to restart - Q for the title screen"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, -90.0, 0.0),
        DespawnOnExit(Screen::GameOver),
    ));
}

fn restart_run(mut session: ResMut<Session>, mut next_screen: ResMut<NextState<Screen>>) {
    session.restart();
    next_screen.set(Screen::Gameplay);
}

fn quit_to_title(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
