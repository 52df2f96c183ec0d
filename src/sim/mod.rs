//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod accumulator;
pub mod grid;
pub mod integrator;
pub mod pendulum;
pub mod rng;
pub mod scoring;
pub mod state;
pub mod tick;

pub use accumulator::{Accumulator, StepReport};
pub use grid::{Cell, Grid, Selection};
pub use integrator::rk4_step;
pub use pendulum::{BobPositions, Derivative, PendulumState, derivative};
pub use rng::{SeedRng, parse_seed, time_seed};
pub use scoring::score;
pub use state::{GamePhase, Landing, Round, RoundEvent, Session};
pub use tick::{Action, RoundSnapshot, TickInput, tick};
