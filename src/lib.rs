//! Pendulum Drop - a double-pendulum guessing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pendulum physics, round state machine, scoring)
//! - `reveal`: Cosmetic score count-up for presentation layers
//! - `settings`: Data-driven game configuration

pub mod reveal;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, GameConfig};
pub use sim::{Action, GamePhase, RoundSnapshot, Session, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (240 Hz)
    pub const SIM_DT: f64 = 1.0 / 240.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Length of a running round (seconds)
    pub const ROUND_DURATION: f64 = 5.0;
    /// Slack on the round clock so summed frame times that round just short
    /// of the duration still end the round on that frame
    pub const CLOCK_EPSILON: f64 = 1e-9;
    /// Slow-motion factor for the attract-mode pendulum
    pub const IDLE_TIME_SCALE: f64 = 0.6;

    /// Play area in world units (pixels)
    pub const PLAY_WIDTH: f64 = 1000.0;
    pub const PLAY_HEIGHT: f64 = 1600.0;
    /// Grid columns across the play area
    pub const GRID_COLUMNS: u32 = 20;
    /// Largest grid a session will build (rows * columns)
    pub const MAX_GRID_CELLS: u32 = 1 << 20;

    /// Bob masses
    pub const M1: f64 = 1.0;
    pub const M2: f64 = 1.0;
    /// World pixels per meter
    pub const PX_PER_METER: f64 = 100.0;
    /// Gravity (pixels/s²)
    pub const GRAVITY: f64 = 9.81 * PX_PER_METER;
    /// Linear damping on each joint (1/s)
    pub const DAMPING: f64 = 0.03;

    /// Rod length range as a fraction of the shorter play dimension
    pub const MIN_LENGTH_FRAC: f64 = 0.18;
    pub const MAX_LENGTH_FRAC: f64 = 0.32;

    /// Pivot height as a fraction of play height
    pub const PIVOT_Y_IDLE: f64 = 0.16;
    pub const PIVOT_Y_PLAY: f64 = 0.25;

    /// Score count-up duration on the result screen (seconds)
    pub const SCORE_REVEAL_DURATION: f64 = 0.78;

    /// Score bounds
    pub const MIN_SCORE: u32 = 1;
    pub const MAX_SCORE: u32 = 10_000;
}
