//! Session state and the turn driver.
//!
//! A session tracks the player's progress across levels: score, level
//! number, the finite ammunition queue, and the shot counter that paces
//! row injections. The turn driver consumes fire requests, resolves them
//! against the board in one step, commits the result, and decides whether
//! the level (or the run) is over. Presentation reacts to the messages
//! emitted here; it never drives the rules.

use std::collections::VecDeque;

use bevy::prelude::*;
use rand::Rng;

use super::board::{Board, Cell, HitReport};
use super::config::GameConfig;
use super::geometry::GridPos;
use super::palette::{ColorPair, LevelPalette};
use super::render::BoardDirty;
use super::resolver::{ShotResolution, resolve_shot};
use super::shooter::{FireShot, Shooter};
use super::ResolveSystems;
use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<ShotFired>();
    app.add_message::<ClusterPopped>();
    app.add_message::<FloatingDropped>();
    app.init_resource::<Session>();

    app.add_systems(OnEnter(Screen::Gameplay), setup_level);
    app.add_systems(
        Update,
        resolve_fired_shots
            .in_set(ResolveSystems)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// A shot has been resolved and committed. Carries the flight path so the
/// presentation layer can replay it as a ghost animation.
#[derive(Message, Debug, Clone)]
pub struct ShotFired {
    pub path: Vec<Vec2>,
    pub color: ColorPair,
}

/// A cluster popped; the listed cells are already empty on the board.
#[derive(Message, Debug, Clone)]
pub struct ClusterPopped {
    pub cells: Vec<GridPos>,
    pub color: ColorPair,
}

/// Bubbles cut off from the ceiling were dropped. Scores nothing.
#[derive(Message, Debug, Clone)]
pub struct FloatingDropped {
    pub cells: Vec<GridPos>,
}

/// What the turn driver decided after a shot was accepted onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    Continue,
    LevelComplete,
    GameOver,
}

/// Player progress across levels.
#[derive(Resource, Debug, Clone)]
pub struct Session {
    pub level: u32,
    pub score: u32,
    /// Accepted shots since the last row injection.
    pub shots_since_advance: u32,
    pub queue: VecDeque<ColorPair>,
    pub palette: LevelPalette,
}

impl Default for Session {
    fn default() -> Self {
        let mut rng = rand::rng();
        Self {
            level: 1,
            score: 0,
            shots_since_advance: 0,
            queue: VecDeque::new(),
            palette: LevelPalette::for_level(1, &mut rng),
        }
    }
}

impl Session {
    /// Back to level 1 with nothing banked.
    pub fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.shots_since_advance = 0;
        self.queue.clear();
    }

    /// Pop the next bubble off the ammunition queue.
    pub fn next_bubble(&mut self) -> Option<ColorPair> {
        self.queue.pop_front()
    }

    pub fn ammo_remaining(&self) -> usize {
        self.queue.len()
    }

    /// Credit a committed hit: every popped bubble is worth
    /// `points_per_bubble`, pruned bubbles fall for free.
    pub fn credit(&mut self, report: &HitReport, points_per_bubble: u32) {
        self.score += points_per_bubble * report.popped.len() as u32;
    }
}

/// Bookkeeping after a shot landed and its cluster work is committed:
/// advance the shot counter, inject a row on cadence, and decide whether
/// the level or the run ended. `ammo_exhausted` means no bubble is
/// chambered and the queue is empty.
pub fn end_of_turn(
    board: &mut Board,
    session: &mut Session,
    config: &GameConfig,
    rng: &mut impl Rng,
    ammo_exhausted: bool,
) -> TurnEvent {
    session.shots_since_advance += 1;

    if board.is_empty() {
        return TurnEvent::LevelComplete;
    }

    if session.shots_since_advance >= config.shots_per_advance {
        session.shots_since_advance = 0;
        if board.advance_rows(&session.palette, rng) {
            return TurnEvent::GameOver;
        }
        if board.is_empty() {
            // Injection recolors the top rows, so this cannot happen on a
            // non-empty board, but the check keeps the decision local.
            return TurnEvent::LevelComplete;
        }
    }

    if ammo_exhausted {
        return TurnEvent::LevelComplete;
    }

    TurnEvent::Continue
}

/// Build the board, palette, queue and shooter for the session's level.
fn setup_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut session: ResMut<Session>,
    mut shooter: ResMut<Shooter>,
    mut dirty: ResMut<BoardDirty>,
) {
    let mut rng = rand::rng();

    session.shots_since_advance = 0;
    session.palette = LevelPalette::for_level(session.level, &mut rng);

    let mut board = Board::new(config.grid_rows, config.grid_cols);
    board.populate(
        session.level,
        config.fill_row_fraction,
        config.clear_fraction,
        &session.palette,
        &mut rng,
    );

    session.queue = (0..config.queue_size)
        .map(|_| session.palette.random_pair(&mut rng))
        .collect();

    shooter.reset(config.shooter_anchor());
    let first = session.next_bubble();
    shooter.load(first);

    info!(
        "level {} ready: {} bubbles on board, {} in the queue",
        session.level,
        board.filled().count(),
        session.ammo_remaining()
    );

    commands.insert_resource(board);
    dirty.0 = true;
}

/// Consume fire requests: resolve the flight, commit the hit, score it,
/// reload, and route the end-of-turn decision to the right screen.
fn resolve_fired_shots(
    mut fire_events: MessageReader<FireShot>,
    mut board: ResMut<Board>,
    mut session: ResMut<Session>,
    mut shooter: ResMut<Shooter>,
    config: Res<GameConfig>,
    mut shot_events: MessageWriter<ShotFired>,
    mut popped_events: MessageWriter<ClusterPopped>,
    mut dropped_events: MessageWriter<FloatingDropped>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut dirty: ResMut<BoardDirty>,
) {
    for event in fire_events.read() {
        let layout = config.layout();
        let outcome = resolve_shot(
            &board,
            &layout,
            event.origin,
            event.angle_degrees,
            config.shot_step,
        );

        shot_events.write(ShotFired {
            path: outcome.path.clone(),
            color: event.color,
        });

        let cell = match outcome.resolution {
            ShotResolution::Landed(cell) => cell,
            ShotResolution::Lost => {
                info!("shot lost at level {}, final score {}", session.level, session.score);
                next_screen.set(Screen::GameOver);
                return;
            }
        };

        board.set(cell, Cell::Filled(event.color));
        let report = board.commit_hit(cell, config.min_cluster_size);
        session.credit(&report, config.points_per_bubble);

        if !report.popped.is_empty() {
            let color = report.popped_color.unwrap_or(event.color);
            popped_events.write(ClusterPopped {
                cells: report.popped,
                color,
            });
        }
        if !report.pruned.is_empty() {
            dropped_events.write(FloatingDropped {
                cells: report.pruned,
            });
        }
        dirty.0 = true;

        let next = session.next_bubble();
        shooter.load(next);
        let ammo_exhausted = shooter.loaded().is_none();

        let mut rng = rand::rng();
        match end_of_turn(&mut board, &mut session, &config, &mut rng, ammo_exhausted) {
            TurnEvent::Continue => {}
            TurnEvent::LevelComplete => {
                info!("level {} cleared with score {}", session.level, session.score);
                next_screen.set(Screen::LevelComplete);
            }
            TurnEvent::GameOver => {
                info!("board reached the bottom on level {}", session.level);
                next_screen.set(Screen::GameOver);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fixed_palette() -> LevelPalette {
        LevelPalette::from_colors(vec![
            Color::srgb_u8(0xFF, 0xFC, 0xF7),
            Color::srgb_u8(0xE4, 0xF0, 0xD0),
            Color::srgb_u8(0x0A, 0x09, 0x08),
        ])
        .unwrap()
    }

    fn session_with(palette: LevelPalette, ammo: usize) -> Session {
        let mut rng = StdRng::seed_from_u64(3);
        let queue = (0..ammo).map(|_| palette.random_pair(&mut rng)).collect();
        Session {
            level: 1,
            score: 0,
            shots_since_advance: 0,
            queue,
            palette,
        }
    }

    fn board_with_one_bubble(palette: &LevelPalette) -> Board {
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = Board::new(12, 12);
        board.set(
            GridPos::new(0, 0),
            Cell::Filled(palette.random_pair(&mut rng)),
        );
        board
    }

    #[test]
    fn cleared_board_completes_the_level() {
        let palette = fixed_palette();
        let mut session = session_with(palette, 10);
        let mut board = Board::new(12, 12);
        let mut rng = StdRng::seed_from_u64(1);

        let event = end_of_turn(&mut board, &mut session, &GameConfig::default(), &mut rng, false);
        assert_eq!(event, TurnEvent::LevelComplete);
    }

    #[test]
    fn ratchet_fires_on_the_configured_cadence() {
        let palette = fixed_palette();
        let mut session = session_with(palette.clone(), 100);
        let mut board = board_with_one_bubble(&palette);
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(2);

        for shot in 1..config.shots_per_advance {
            let event = end_of_turn(&mut board, &mut session, &config, &mut rng, false);
            assert_eq!(event, TurnEvent::Continue, "shot {shot}");
            assert_eq!(session.shots_since_advance, shot);
            // No injection yet: rows 2+ untouched.
            assert!(board.get(GridPos::new(2, 0)).is_empty());
        }

        let event = end_of_turn(&mut board, &mut session, &config, &mut rng, false);
        assert_eq!(event, TurnEvent::Continue);
        assert_eq!(session.shots_since_advance, 0);
        // The lone bubble at (0, 0) was pushed down to (2, 0).
        assert!(!board.get(GridPos::new(2, 0)).is_empty());
    }

    #[test]
    fn ratchet_against_a_full_column_ends_the_run() {
        let palette = fixed_palette();
        let mut session = session_with(palette.clone(), 100);
        session.shots_since_advance = GameConfig::default().shots_per_advance - 1;

        let mut rng = StdRng::seed_from_u64(4);
        let mut board = Board::new(12, 12);
        for row in 0..12 {
            board.set(
                GridPos::new(row, 6),
                Cell::Filled(palette.random_pair(&mut rng)),
            );
        }

        let event = end_of_turn(&mut board, &mut session, &GameConfig::default(), &mut rng, false);
        assert_eq!(event, TurnEvent::GameOver);
    }

    #[test]
    fn running_out_of_ammo_ends_the_level() {
        let palette = fixed_palette();
        let mut session = session_with(palette.clone(), 0);
        let mut board = board_with_one_bubble(&palette);
        let mut rng = StdRng::seed_from_u64(6);

        let event = end_of_turn(&mut board, &mut session, &GameConfig::default(), &mut rng, true);
        assert_eq!(event, TurnEvent::LevelComplete);
    }

    #[test]
    fn restart_resets_progress_but_not_the_palette() {
        let palette = fixed_palette();
        let mut session = session_with(palette, 10);
        session.level = 4;
        session.score = 990;
        session.shots_since_advance = 3;

        session.restart();
        assert_eq!(session.level, 1);
        assert_eq!(session.score, 0);
        assert_eq!(session.shots_since_advance, 0);
        assert_eq!(session.ammo_remaining(), 0);
    }

    #[test]
    fn popping_a_trio_credits_fifteen_points_per_bubble() {
        let config = GameConfig::default();
        let layout = config.layout();
        let mut session = session_with(fixed_palette(), 10);

        let dark = Color::srgb_u8(0x0A, 0x09, 0x08);
        let green = ColorPair {
            fill: Color::srgb_u8(0xE4, 0xF0, 0xD0),
            outline: dark,
        };
        let white = ColorPair {
            fill: Color::srgb_u8(0xFF, 0xFC, 0xF7),
            outline: dark,
        };

        // A green chain anchoring the field to the ceiling, with a white
        // pair hanging off its end; the shot completes the white trio.
        let mut board = Board::new(12, 12);
        for row in 0..=4 {
            board.set(GridPos::new(row, 3), Cell::Filled(green));
        }
        board.set(GridPos::new(5, 2), Cell::Filled(white));
        board.set(GridPos::new(5, 3), Cell::Filled(white));

        let origin = Vec2::new(layout.cell_center(GridPos::new(5, 3)).x, 500.0);
        let outcome = resolve_shot(&board, &layout, origin, 90.0, config.shot_step);
        let ShotResolution::Landed(cell) = outcome.resolution else {
            panic!("shot should land, got {:?}", outcome.resolution);
        };

        board.set(cell, Cell::Filled(white));
        let report = board.commit_hit(cell, config.min_cluster_size);
        session.credit(&report, config.points_per_bubble);

        assert_eq!(report.popped.len(), 3);
        assert_eq!(session.score, 45);
        // The anchored chain survives the pop and the prune.
        for row in 0..=4 {
            assert_eq!(board.get(GridPos::new(row, 3)).color(), Some(green));
        }
    }

    #[test]
    fn sub_threshold_hits_credit_nothing() {
        let mut session = session_with(fixed_palette(), 10);
        let white = ColorPair {
            fill: Color::srgb_u8(0xFF, 0xFC, 0xF7),
            outline: Color::srgb_u8(0x0A, 0x09, 0x08),
        };

        let mut board = Board::new(12, 12);
        board.set(GridPos::new(0, 0), Cell::Filled(white));
        board.set(GridPos::new(0, 1), Cell::Filled(white));

        let report = board.commit_hit(GridPos::new(0, 1), 3);
        session.credit(&report, GameConfig::default().points_per_bubble);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn queue_drains_one_bubble_per_shot() {
        let palette = fixed_palette();
        let mut session = session_with(palette, 3);

        assert!(session.next_bubble().is_some());
        assert!(session.next_bubble().is_some());
        assert!(session.next_bubble().is_some());
        assert!(session.next_bubble().is_none());
    }
}
