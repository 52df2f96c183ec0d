//! Per-frame tick
//!
//! The host calls [`tick`] once per frame with the wall-clock time since the
//! previous frame and whatever player actions arrived in between.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::pendulum::{BobPositions, PendulumState};
use super::state::{GamePhase, Landing, RoundEvent, Session};

/// A player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Begin a new round (from attract mode or a finished round)
    Play,
    /// Launch the pendulum
    Start,
    /// Unmark every cell
    Clear,
    /// Tap a cell
    Toggle(Cell),
    /// Drag across a cell
    Paint(Cell),
    /// Return to attract mode
    End,
}

impl Action {
    fn changes_phase(&self) -> bool {
        matches!(self, Action::Play | Action::Start | Action::End)
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Actions in arrival order
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }
}

/// Everything a presentation layer needs to draw a frame
#[derive(Debug, Clone, Serialize)]
pub struct RoundSnapshot {
    pub seed: u32,
    pub phase: GamePhase,
    pub state: PendulumState,
    pub pivot: DVec2,
    pub bobs: BobPositions,
    pub grid: Grid,
    /// Marked cells, row-major
    pub selected: Vec<Cell>,
    /// Seconds left on the round clock
    pub remaining: f64,
    pub landing: Option<Landing>,
    pub hit: bool,
    pub score: u32,
    /// Events raised during this tick
    pub events: Vec<RoundEvent>,
}

impl Session {
    /// Apply one action; returns whether it was accepted
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Play => self.play(),
            Action::Start => self.start(),
            Action::Clear => self.clear_selection(),
            Action::Toggle(cell) => self.toggle_cell(cell),
            Action::Paint(cell) => self.paint_cell(cell),
            Action::End => self.end(),
        }
    }

    /// Read-only view of the session, draining pending events
    pub fn snapshot(&mut self) -> RoundSnapshot {
        RoundSnapshot {
            seed: self.seed(),
            phase: self.phase(),
            state: self.round().state,
            pivot: self.pivot(),
            bobs: self.bob_positions(),
            grid: *self.grid(),
            selected: self.round().selection.cells(),
            remaining: self.remaining(),
            landing: self.landing(),
            hit: self.round().hit,
            score: self.round().score,
            events: self.take_events(),
        }
    }
}

/// Advance the session by one host frame.
///
/// Actions apply first, in order. `frame_dt` elapsed before they arrived, so
/// if any of them moved the session to another phase the frame is not
/// integrated and the round clock does not move. Otherwise physics and the
/// clock advance, and the round-end check runs last.
pub fn tick(session: &mut Session, input: &TickInput, frame_dt: f64) -> RoundSnapshot {
    let mut transitioned = false;
    for &action in &input.actions {
        let accepted = session.apply(action);
        transitioned |= accepted && action.changes_phase();
    }

    if !transitioned {
        session.advance(frame_dt);
    }

    session.snapshot()
}
