//! Frame-time accumulator
//!
//! Turns variable host frame durations into whole fixed steps, carrying the
//! remainder over to the next frame.

use super::integrator::rk4_step;
use super::pendulum::PendulumState;

/// Outcome of one [`Accumulator::advance`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Fixed steps applied this frame
    pub substeps: u32,
    /// A step went non-finite and the state was replaced
    pub diverged: bool,
}

#[derive(Debug, Clone)]
pub struct Accumulator {
    /// Fixed step size (seconds)
    pub step: f64,
    /// Most steps allowed per frame
    pub max_substeps: u32,
    /// Longest frame duration accepted (seconds)
    pub max_frame: f64,
    /// Simulated time not yet consumed
    pending: f64,
}

impl Accumulator {
    pub fn new(step: f64, max_substeps: u32, max_frame: f64) -> Self {
        Self {
            step,
            max_substeps,
            max_frame,
            pending: 0.0,
        }
    }

    pub fn pending(&self) -> f64 {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = 0.0;
    }

    /// Advance `state` by the fixed steps that fit in `frame_dt * time_scale`.
    ///
    /// If a step goes non-finite the state is replaced by `reseed()`, pending
    /// time is dropped and no further steps run this frame.
    pub fn advance(
        &mut self,
        state: &mut PendulumState,
        frame_dt: f64,
        time_scale: f64,
        mut reseed: impl FnMut() -> PendulumState,
    ) -> StepReport {
        let mut report = StepReport::default();
        self.pending += frame_dt.clamp(0.0, self.max_frame) * time_scale;

        while self.pending >= self.step && report.substeps < self.max_substeps {
            let next = rk4_step(state, self.step);
            if !next.is_finite() {
                log::debug!(
                    "Pendulum diverged after {} substeps (l1={:.1}, l2={:.1}), reseeding",
                    report.substeps,
                    state.l1,
                    state.l2
                );
                *state = reseed();
                self.pending = 0.0;
                report.diverged = true;
                break;
            }
            *state = next;
            self.pending -= self.step;
            report.substeps += 1;
        }

        // Backlog is capped at one full frame of substeps
        let backlog = self.step * self.max_substeps as f64;
        if report.substeps == self.max_substeps && self.pending > backlog {
            self.pending = backlog;
        }

        report
    }
}
