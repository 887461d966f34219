//! The level-complete screen, shown when the board is cleared or the
//! ammunition queue runs dry.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::Screen;
use crate::game::Session;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::LevelComplete), spawn_level_complete_screen);
    app.add_systems(
        Update,
        next_level
            .run_if(in_state(Screen::LevelComplete).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_level_complete_screen(mut commands: Commands, session: Res<Session>) {
    commands.spawn((
        Name::new("Level Complete Header"),
        Text2d::new(format!("Level {} complete!", session.level)),
        TextFont {
            font_size: 36.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.1, 0.15)),
        Transform::from_xyz(0.0, 60.0, 0.0),
        DespawnOnExit(Screen::LevelComplete),
    ));
    commands.spawn((
        Name::new("Level Complete Score"),
        Text2d::new(format!("Score: {}", session.score)),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, 0.0, 0.0),
        DespawnOnExit(Screen::LevelComplete),
    ));
    commands.spawn((
        Name::new("Level Complete Prompt"),
        Text2d::new("Press Enter for the next level"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::srgb(0.2, 0.2, 0.25)),
        Transform::from_xyz(0.0, -80.0, 0.0),
        DespawnOnExit(Screen::LevelComplete),
    ));
}

fn next_level(mut session: ResMut<Session>, mut next_screen: ResMut<NextState<Screen>>) {
    session.level += 1;
    next_screen.set(Screen::Gameplay);
}
