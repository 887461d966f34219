//! The shooter at the bottom of the board.
//!
//! The player aims with the mouse and fires bubbles upward. The shooter
//! holds one loaded bubble; while the fired bubble's ghost is still in
//! flight the shooter is empty and refuses further input. Aim state is a
//! plain resource in board space so the math stays testable without an app.

use bevy::{prelude::*, window::PrimaryWindow};

use super::config::GameConfig;
use super::palette::ColorPair;
use super::render::ProjectileGhost;
use super::{InputSystems, PresentSystems};
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<FireShot>();
    app.init_resource::<Shooter>();

    app.add_systems(
        Update,
        (
            (aim_shooter, handle_fire_input).in_set(InputSystems),
            draw_guide_line.in_set(PresentSystems),
        )
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Message requesting one shot. Consumed by the turn resolver.
#[derive(Message, Debug, Clone)]
pub struct FireShot {
    pub origin: Vec2,
    pub angle_degrees: f32,
    pub color: ColorPair,
}

/// Aim and ammunition state of the launcher.
#[derive(Resource, Debug, Clone)]
pub struct Shooter {
    anchor: Vec2,
    angle_degrees: f32,
    loaded: Option<ColorPair>,
}

impl Default for Shooter {
    fn default() -> Self {
        Self {
            anchor: GameConfig::default().shooter_anchor(),
            angle_degrees: 90.0,
            loaded: None,
        }
    }
}

impl Shooter {
    /// Reset for a fresh level: straight up, nothing chambered.
    pub fn reset(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.angle_degrees = 90.0;
        self.loaded = None;
    }

    /// Fixed board-space point shots originate from.
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Current aim in degrees: 0 points right, 90 straight up, 180 left.
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Aim at a board-space target. The angle is clamped to the upper
    /// half-plane, so aiming below the anchor degrades to horizontal.
    pub fn aim_at(&mut self, target: Vec2) {
        let dx = target.x - self.anchor.x;
        let dy = self.anchor.y - target.y;
        self.angle_degrees = dy.atan2(dx).to_degrees().clamp(0.0, 180.0);
    }

    /// Unit flight direction in board space (y grows downward).
    pub fn direction(&self) -> Vec2 {
        let rad = self.angle_degrees.to_radians();
        Vec2::new(rad.cos(), -rad.sin())
    }

    pub fn loaded(&self) -> Option<ColorPair> {
        self.loaded
    }

    /// Chamber the next bubble, or `None` when the queue ran dry.
    pub fn load(&mut self, bubble: Option<ColorPair>) {
        self.loaded = bubble;
    }

    /// Remove and return the chambered bubble.
    pub fn take_loaded(&mut self) -> Option<ColorPair> {
        self.loaded.take()
    }

    /// Board-space polyline the aiming guide follows: from the anchor along
    /// the aim direction for `max_length` pixels, reflecting off the side
    /// walls, stopping early at the ceiling.
    pub fn guide_path(&self, max_length: f32, board_width: f32) -> Vec<Vec2> {
        let mut points = vec![self.anchor];
        let mut dir = self.direction();
        if !dir.is_finite() || dir.length_squared() < 1e-6 {
            return points;
        }

        let mut pos = self.anchor;
        let mut remaining = max_length;

        // Direction is unit length, so travel distance equals parameter t.
        // Each wall hit flips x, so the distance to the next wall is
        // strictly positive and the loop is bounded by `remaining`.
        while remaining > 0.0 {
            let to_wall = if dir.x > 0.0 {
                (board_width - pos.x) / dir.x
            } else if dir.x < 0.0 {
                -pos.x / dir.x
            } else {
                f32::INFINITY
            };

            let travel = to_wall.min(remaining);
            if travel <= 0.0 {
                break;
            }
            pos += dir * travel;
            if travel == to_wall {
                pos.x = pos.x.clamp(0.0, board_width);
                dir.x = -dir.x;
            }
            points.push(pos);
            remaining -= travel;

            if pos.y <= 0.0 {
                break;
            }
        }

        points
    }
}

/// Update the aim angle from the mouse cursor.
fn aim_shooter(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    config: Res<GameConfig>,
    mut shooter: ResMut<Shooter>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor_pos) = window
        .cursor_position()
        .and_then(|p| camera.viewport_to_world_2d(camera_transform, p).ok())
    else {
        return;
    };

    let target = config.layout().world_to_board(cursor_pos);
    shooter.aim_at(target);
}

/// Fire on click or spacebar. Refused while a ghost is still in flight or
/// nothing is chambered.
fn handle_fire_input(
    mouse_input: Res<ButtonInput<MouseButton>>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    ghost_query: Query<(), With<ProjectileGhost>>,
    mut shooter: ResMut<Shooter>,
    mut fire_events: MessageWriter<FireShot>,
) {
    let fire_pressed =
        mouse_input.just_pressed(MouseButton::Left) || keyboard_input.just_pressed(KeyCode::Space);
    if !fire_pressed {
        return;
    }

    if !ghost_query.is_empty() {
        return;
    }
    let Some(color) = shooter.take_loaded() else {
        return;
    };

    fire_events.write(FireShot {
        origin: shooter.anchor(),
        angle_degrees: shooter.angle_degrees(),
        color,
    });
    info!(
        "fired at {:.1} degrees from {:?}",
        shooter.angle_degrees(),
        shooter.anchor()
    );
}

/// Draw the dotted aiming guide with gizmos, reflections included.
fn draw_guide_line(
    mut gizmos: Gizmos,
    shooter: Res<Shooter>,
    ghost_query: Query<(), With<ProjectileGhost>>,
    config: Res<GameConfig>,
) {
    // No guide while empty or while the previous shot is still animating.
    if shooter.loaded().is_none() || !ghost_query.is_empty() {
        return;
    }

    let layout = config.layout();
    let path = shooter.guide_path(config.guide_length, layout.board_width);
    let color = Color::srgba(0.1, 0.1, 0.1, 0.6);

    for pair in path.windows(2) {
        let (seg_start, seg_end) = (pair[0], pair[1]);
        let length = seg_start.distance(seg_end);
        let segments = (length / 12.0).max(1.0) as i32;
        let dir = (seg_end - seg_start) / segments as f32;

        for i in 0..segments {
            if i % 2 == 0 {
                let a = seg_start + dir * i as f32;
                let b = seg_start + dir * (i as f32 + 0.7);
                gizmos.line_2d(layout.board_to_world(a), layout.board_to_world(b), color);
            }
        }
    }
}
