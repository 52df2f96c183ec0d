//! Round state and the session that drives it
//!
//! A `Session` owns everything that changes between ticks: the seeded random
//! stream, the current phase, the active round and the frame accumulator.
//! Independent sessions never share state.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::accumulator::{Accumulator, StepReport};
use super::grid::{Cell, Grid, Selection};
use super::pendulum::{BobPositions, PendulumState};
use super::rng::SeedRng;
use super::scoring::score;
use crate::consts::{CLOCK_EPSILON, PIVOT_Y_IDLE, PIVOT_Y_PLAY};
use crate::settings::GameConfig;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Attract mode, pendulum swings in slow motion
    Idle,
    /// Player is marking cells, physics frozen
    Selecting,
    /// Simulation playing, round timer counting down
    Running,
    /// Round resolved, result on screen
    Finished,
}

/// Where the second bob came to rest when the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landing {
    Inside(Cell),
    /// Bob was outside the grid
    Outside,
}

impl Landing {
    pub fn cell(&self) -> Option<Cell> {
        match self {
            Landing::Inside(cell) => Some(*cell),
            Landing::Outside => None,
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// Integration blew up and the pendulum was redrawn
    Diverged,
    Finished { landing: Landing, hit: bool, score: u32 },
}

/// One play cycle
#[derive(Debug, Clone)]
pub struct Round {
    /// Pendulum as drawn at the start of the round
    pub initial_state: PendulumState,
    /// Pendulum as of the last integration step
    pub state: PendulumState,
    pub selection: Selection,
    /// Set once the round finishes
    pub landing: Option<Landing>,
    pub hit: bool,
    pub score: u32,
    /// Wall-clock seconds since the run started
    pub elapsed: f64,
}

impl Round {
    pub fn new(initial_state: PendulumState, grid: &Grid) -> Self {
        Self {
            initial_state,
            state: initial_state,
            selection: grid.selection(),
            landing: None,
            hit: false,
            score: 0,
            elapsed: 0.0,
        }
    }
}

/// A game session: the round controller
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    grid: Grid,
    rng: SeedRng,
    phase: GamePhase,
    /// Active round, replaced whenever a new one begins
    round: Round,
    accumulator: Accumulator,
    events: Vec<RoundEvent>,
}

impl Session {
    /// Create a session in attract mode with the given seed
    pub fn new(seed: u32, config: GameConfig) -> Self {
        let grid = Grid::new(config.play_width, config.play_height, config.columns);
        let mut rng = SeedRng::new(seed);
        let initial = PendulumState::random(&mut rng, config.play_width, config.play_height);
        let accumulator = Accumulator::new(config.sim_dt, config.max_substeps, config.max_frame_dt);

        log::info!(
            "Session seed {} ({}x{} grid, cell {:.1})",
            seed,
            grid.columns,
            grid.rows,
            grid.cell_size
        );

        Self {
            round: Round::new(initial, &grid),
            config,
            grid,
            rng,
            phase: GamePhase::Idle,
            accumulator,
            events: Vec::new(),
        }
    }

    /// Create a session seeded from the wall clock
    pub fn from_clock(config: GameConfig) -> Self {
        Self::new(super::rng::time_seed(), config)
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Pendulum pivot; raised in attract mode
    pub fn pivot(&self) -> DVec2 {
        let frac = if self.phase == GamePhase::Idle {
            PIVOT_Y_IDLE
        } else {
            PIVOT_Y_PLAY
        };
        DVec2::new(self.config.play_width * 0.5, self.config.play_height * frac)
    }

    pub fn bob_positions(&self) -> BobPositions {
        self.round.state.bob_positions(self.pivot())
    }

    /// Seconds left on the round clock
    pub fn remaining(&self) -> f64 {
        match self.phase {
            GamePhase::Running => (self.config.round_duration - self.round.elapsed).max(0.0),
            GamePhase::Finished => 0.0,
            GamePhase::Idle | GamePhase::Selecting => self.config.round_duration,
        }
    }

    /// Landing result, only once the round has finished
    pub fn landing(&self) -> Option<Landing> {
        match self.phase {
            GamePhase::Finished => self.round.landing,
            _ => None,
        }
    }

    /// Grid cell under a world point
    pub fn cell_at(&self, x: f64, y: f64) -> Option<Cell> {
        self.grid.locate(x, y)
    }

    /// Events recorded since the last call
    pub fn take_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    fn draw_state(&mut self) -> PendulumState {
        PendulumState::random(&mut self.rng, self.config.play_width, self.config.play_height)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        log::debug!("Phase {:?} -> {:?}", from, to);
        self.events.push(RoundEvent::PhaseChanged { from, to });
    }

    /// Discard the current round and draw a fresh pendulum
    fn begin_round(&mut self) {
        let initial = self.draw_state();
        self.round = Round::new(initial, &self.grid);
        self.accumulator.reset();
    }

    /// Idle/Finished -> Selecting
    pub fn play(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::Finished) {
            return false;
        }
        self.begin_round();
        self.set_phase(GamePhase::Selecting);
        true
    }

    /// Selecting -> Running, needs at least one marked cell
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Selecting || self.round.selection.is_empty() {
            return false;
        }
        self.round.elapsed = 0.0;
        self.accumulator.reset();
        self.set_phase(GamePhase::Running);
        true
    }

    /// Back to attract mode from any active phase
    pub fn end(&mut self) -> bool {
        if self.phase == GamePhase::Idle {
            return false;
        }
        self.begin_round();
        self.set_phase(GamePhase::Idle);
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.phase != GamePhase::Selecting {
            return false;
        }
        self.round.selection.clear();
        true
    }

    pub fn toggle_cell(&mut self, cell: Cell) -> bool {
        self.phase == GamePhase::Selecting && self.round.selection.toggle(cell)
    }

    /// Mark a cell under a drag; already-marked cells stay marked
    pub fn paint_cell(&mut self, cell: Cell) -> bool {
        self.phase == GamePhase::Selecting && self.round.selection.insert(cell)
    }

    /// Advance physics and the round clock by one host frame.
    ///
    /// Only Idle and Running integrate. The finish check runs after
    /// integration so the landing reflects this frame's final state.
    pub fn advance(&mut self, frame_dt: f64) -> StepReport {
        let time_scale = match self.phase {
            GamePhase::Idle => self.config.idle_time_scale,
            GamePhase::Running => 1.0,
            GamePhase::Selecting | GamePhase::Finished => return StepReport::default(),
        };

        let (width, height) = (self.config.play_width, self.config.play_height);
        let rng = &mut self.rng;
        let report = self.accumulator.advance(&mut self.round.state, frame_dt, time_scale, || {
            PendulumState::random(rng, width, height)
        });

        if report.diverged {
            self.round.initial_state = self.round.state;
            self.events.push(RoundEvent::Diverged);
        }

        if self.phase == GamePhase::Running {
            if report.diverged {
                // Fresh pendulum, fresh clock
                self.round.elapsed = 0.0;
            } else {
                self.round.elapsed += frame_dt.max(0.0);
            }
            if self.round.elapsed + CLOCK_EPSILON >= self.config.round_duration {
                self.finish();
            }
        }

        report
    }

    /// Running -> Finished: hit-test the second bob and score
    fn finish(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        let bobs = self.bob_positions();
        let landing = match self.grid.locate(bobs.second.x, bobs.second.y) {
            Some(cell) => Landing::Inside(cell),
            None => Landing::Outside,
        };
        let hit = landing
            .cell()
            .is_some_and(|cell| self.round.selection.contains(cell));
        let points = if hit {
            score(self.round.selection.len() as u32, self.grid.cell_count())
        } else {
            0
        };

        self.round.landing = Some(landing);
        self.round.hit = hit;
        self.round.score = points;

        log::info!(
            "Round over: landing {:?}, {} of {} cells marked, hit={}, score={}",
            landing,
            self.round.selection.len(),
            self.grid.cell_count(),
            hit,
            points
        );

        self.set_phase(GamePhase::Finished);
        self.events.push(RoundEvent::Finished {
            landing,
            hit,
            score: points,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(12345, GameConfig::default())
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert_eq!(s.seed(), 12345);
        assert!(s.round().selection.is_empty());
        assert_eq!(s.round().state, s.round().initial_state);
        assert_eq!(s.landing(), None);
        assert_eq!(s.remaining(), 5.0);
    }

    #[test]
    fn test_play_draws_new_pendulum() {
        let mut s = session();
        let idle_state = s.round().state;
        assert!(s.play());
        assert_eq!(s.phase(), GamePhase::Selecting);
        assert_ne!(s.round().initial_state, idle_state);
        assert!(!s.play());
    }

    #[test]
    fn test_start_requires_selection() {
        let mut s = session();
        s.play();
        assert!(!s.start());
        assert_eq!(s.phase(), GamePhase::Selecting);

        assert!(s.toggle_cell(Cell::new(1, 1)));
        assert!(s.start());
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_selection_edits_only_while_selecting() {
        let mut s = session();
        assert!(!s.toggle_cell(Cell::new(0, 0)));
        assert!(!s.paint_cell(Cell::new(0, 0)));
        assert!(!s.clear_selection());

        s.play();
        assert!(s.paint_cell(Cell::new(0, 0)));
        assert!(!s.paint_cell(Cell::new(0, 0)));
        assert!(s.paint_cell(Cell::new(0, 1)));
        assert!(s.toggle_cell(Cell::new(0, 1)));
        assert_eq!(s.round().selection.len(), 1);
        assert!(!s.toggle_cell(Cell::new(99, 0)));

        s.start();
        assert!(!s.toggle_cell(Cell::new(5, 5)));
        assert!(!s.clear_selection());
        assert_eq!(s.round().selection.len(), 1);
    }

    #[test]
    fn test_physics_frozen_while_selecting() {
        let mut s = session();
        s.play();
        let before = s.round().state;
        let report = s.advance(0.05);
        assert_eq!(report.substeps, 0);
        assert_eq!(s.round().state, before);
    }

    #[test]
    fn test_idle_runs_in_slow_motion() {
        let mut s = session();
        // 0.05 s * 0.6 = 0.03 s = 7.2 steps
        let report = s.advance(0.05);
        assert_eq!(report.substeps, 7);
        assert_ne!(s.round().state, s.round().initial_state);
    }

    #[test]
    fn test_round_finishes_once() {
        let mut s = session();
        s.play();
        s.paint_cell(Cell::new(0, 0));
        s.start();

        let mut finished_on = Vec::new();
        for frame in 1..=400 {
            s.advance(1.0 / 60.0);
            if s
                .take_events()
                .iter()
                .any(|e| matches!(e, RoundEvent::Finished { .. }))
            {
                finished_on.push(frame);
            }
        }
        assert_eq!(finished_on, vec![300]);
        assert_eq!(s.phase(), GamePhase::Finished);
        assert_eq!(s.remaining(), 0.0);
        assert!(s.landing().is_some());
    }

    #[test]
    fn test_round_ends_on_last_frame_at_common_rates() {
        for fps in [24.0, 30.0, 50.0, 60.0, 75.0, 100.0, 120.0, 144.0] {
            let frames = (5.0 * fps) as usize;
            let mut s = session();
            s.play();
            s.paint_cell(Cell::new(0, 0));
            s.start();

            for _ in 1..frames {
                s.advance(1.0 / fps);
            }
            assert_eq!(s.phase(), GamePhase::Running, "{fps} fps ended early");
            s.advance(1.0 / fps);
            assert_eq!(s.phase(), GamePhase::Finished, "{fps} fps ended late");
        }
    }

    #[test]
    fn test_single_long_frame_finishes() {
        let mut s = session();
        s.play();
        s.paint_cell(Cell::new(0, 0));
        s.start();
        s.advance(5.0);
        // One big frame: the clock runs out, physics only gets its capped share
        assert_eq!(s.phase(), GamePhase::Finished);
        if s.round().hit {
            assert_eq!(s.landing(), Some(Landing::Inside(Cell::new(0, 0))));
            assert_eq!(s.round().score, 10_000);
        } else {
            assert_eq!(s.round().score, 0);
        }
    }

    #[test]
    fn test_divergence_restarts_clock() {
        let mut s = session();
        s.play();
        s.paint_cell(Cell::new(0, 0));
        s.start();
        s.advance(1.0);
        assert!(s.round().elapsed > 0.9);

        s.round.state.omega1 = 1e200;
        s.round.state.omega2 = -1e200;
        let report = s.advance(1.0 / 60.0);

        assert!(report.diverged);
        assert!(s.round().state.is_finite());
        assert_eq!(s.round().state, s.round().initial_state);
        assert_eq!(s.round().elapsed, 0.0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert!(s.take_events().contains(&RoundEvent::Diverged));
    }

    #[test]
    fn test_divergence_in_idle() {
        let mut s = session();
        s.round.state.omega1 = 1e200;
        let report = s.advance(1.0 / 60.0);
        assert!(report.diverged);
        assert!(s.round().state.is_finite());
        assert_eq!(s.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_end_returns_to_idle() {
        let mut s = session();
        assert!(!s.end());

        s.play();
        s.paint_cell(Cell::new(2, 2));
        s.start();
        assert!(s.end());
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.round().selection.is_empty());
        assert_eq!(s.round().landing, None);
    }

    #[test]
    fn test_play_again_from_finished() {
        let mut s = session();
        s.play();
        s.paint_cell(Cell::new(2, 2));
        s.start();
        s.advance(5.0);
        assert_eq!(s.phase(), GamePhase::Finished);

        assert!(s.play());
        assert_eq!(s.phase(), GamePhase::Selecting);
        assert!(s.round().selection.is_empty());
        assert_eq!(s.round().score, 0);
        assert_eq!(s.round().landing, None);
        assert_eq!(s.landing(), None);
    }

    #[test]
    fn test_pivot_moves_with_phase() {
        let mut s = session();
        assert_eq!(s.pivot(), DVec2::new(500.0, 256.0));
        s.play();
        assert_eq!(s.pivot(), DVec2::new(500.0, 400.0));
    }

    #[test]
    fn test_config_is_read_only_view() {
        let s = session();
        assert_eq!(s.config(), &GameConfig::default());
        assert_eq!(s.pivot().x, s.config().play_width * 0.5);
        assert_eq!(s.grid().cell_size, s.config().play_width / s.config().columns as f64);
    }

    #[test]
    fn test_unvalidated_oversized_config_builds() {
        let config = GameConfig {
            play_height: 1e12,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut s = Session::new(1, config);
        assert!(s.grid().cell_count() <= crate::consts::MAX_GRID_CELLS);
        let last_row = s.grid().rows - 1;
        assert!(s.play());
        assert!(s.paint_cell(Cell::new(last_row, 0)));
        assert!(s.start());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = Session::new(7, GameConfig::default());
        let mut b = Session::new(7, GameConfig::default());
        a.play();
        a.advance(0.5);
        b.play();
        assert_eq!(a.round().initial_state, b.round().initial_state);
    }
}
