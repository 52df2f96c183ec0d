//! Double pendulum state and equations of motion
//!
//! Angles are measured from the downward vertical, screen coordinates
//! (y grows downward), so a hanging pendulum has `theta = 0`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rng::SeedRng;
use crate::consts::*;

/// Full dynamic state of the pendulum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
    /// Rod lengths, fixed for the lifetime of a round
    pub l1: f64,
    pub l2: f64,
}

/// Time derivative of the evolving components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivative {
    pub dtheta1: f64,
    pub dtheta2: f64,
    pub domega1: f64,
    pub domega2: f64,
}

/// World positions of both bobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BobPositions {
    pub first: DVec2,
    pub second: DVec2,
}

impl PendulumState {
    /// Draw a fresh resting pendulum sized to the play area.
    ///
    /// Draw order is theta1, theta2, l1, l2.
    pub fn random(rng: &mut SeedRng, play_width: f64, play_height: f64) -> Self {
        use std::f64::consts::PI;

        let min_dim = play_width.min(play_height);
        let min_len = MIN_LENGTH_FRAC * min_dim;
        let max_len = MAX_LENGTH_FRAC * min_dim;

        let theta1 = rng.range(-PI, PI);
        let theta2 = rng.range(-PI, PI);
        let l1 = rng.range(min_len, max_len);
        let l2 = rng.range(min_len, max_len);

        Self {
            theta1,
            theta2,
            omega1: 0.0,
            omega2: 0.0,
            l1,
            l2,
        }
    }

    /// `self + k * factor` on the evolving components, lengths untouched
    #[inline]
    pub fn offset(&self, k: &Derivative, factor: f64) -> Self {
        Self {
            theta1: self.theta1 + k.dtheta1 * factor,
            theta2: self.theta2 + k.dtheta2 * factor,
            omega1: self.omega1 + k.domega1 * factor,
            omega2: self.omega2 + k.domega2 * factor,
            l1: self.l1,
            l2: self.l2,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.theta2.is_finite()
            && self.omega1.is_finite()
            && self.omega2.is_finite()
            && self.l1.is_finite()
            && self.l2.is_finite()
    }

    /// Forward kinematics from `pivot`
    pub fn bob_positions(&self, pivot: DVec2) -> BobPositions {
        let first = pivot + DVec2::new(self.theta1.sin(), self.theta1.cos()) * self.l1;
        let second = first + DVec2::new(self.theta2.sin(), self.theta2.cos()) * self.l2;
        BobPositions { first, second }
    }
}

/// Equal-mass double pendulum under gravity with per-joint linear damping
pub fn derivative(s: &PendulumState) -> Derivative {
    let (t1, t2) = (s.theta1, s.theta2);
    let (w1, w2) = (s.omega1, s.omega2);

    let delta = t1 - t2;
    let sin_delta = delta.sin();
    let cos_delta = delta.cos();

    let common = 2.0 * M1 + M2 - M2 * (2.0 * delta).cos();
    let den1 = s.l1 * common;
    let den2 = s.l2 * common;

    let num1 = -GRAVITY * (2.0 * M1 + M2) * t1.sin()
        - M2 * GRAVITY * (t1 - 2.0 * t2).sin()
        - 2.0 * sin_delta * M2 * (w2 * w2 * s.l2 + w1 * w1 * s.l1 * cos_delta);

    let num2 = 2.0
        * sin_delta
        * (w1 * w1 * s.l1 * (M1 + M2)
            + GRAVITY * (M1 + M2) * t1.cos()
            + w2 * w2 * s.l2 * M2 * cos_delta);

    Derivative {
        dtheta1: w1,
        dtheta2: w2,
        domega1: num1 / den1 - DAMPING * w1,
        domega2: num2 / den2 - DAMPING * w2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hanging(l1: f64, l2: f64) -> PendulumState {
        PendulumState {
            theta1: 0.0,
            theta2: 0.0,
            omega1: 0.0,
            omega2: 0.0,
            l1,
            l2,
        }
    }

    #[test]
    fn test_rest_is_equilibrium() {
        let d = derivative(&hanging(200.0, 250.0));
        assert_eq!(d.dtheta1, 0.0);
        assert_eq!(d.dtheta2, 0.0);
        assert!(d.domega1.abs() < 1e-12);
        assert!(d.domega2.abs() < 1e-12);
    }

    #[test]
    fn test_gravity_restores_displaced_pendulum() {
        // Both rods swung right in line: the upper joint accelerates back
        let mut s = hanging(200.0, 200.0);
        s.theta1 = 0.3;
        s.theta2 = 0.3;
        let d = derivative(&s);
        assert!(d.domega1 < 0.0);
        // delta = 0 so the lower joint feels no relative torque
        assert!(d.domega2.abs() < 1e-9);
    }

    #[test]
    fn test_damping_opposes_velocity() {
        let mut s = hanging(200.0, 200.0);
        s.omega1 = 2.0;
        s.omega2 = -3.0;
        let d = derivative(&s);
        assert_eq!(d.dtheta1, 2.0);
        assert_eq!(d.dtheta2, -3.0);
        assert!((d.domega1 + DAMPING * 2.0).abs() < 1e-9);
        assert!((d.domega2 - DAMPING * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_state_ranges() {
        let mut rng = SeedRng::new(42);
        for _ in 0..200 {
            let s = PendulumState::random(&mut rng, 1000.0, 1600.0);
            assert!(s.theta1.abs() <= std::f64::consts::PI);
            assert!(s.theta2.abs() <= std::f64::consts::PI);
            assert_eq!(s.omega1, 0.0);
            assert_eq!(s.omega2, 0.0);
            assert!((180.0..=320.0).contains(&s.l1));
            assert!((180.0..=320.0).contains(&s.l2));
        }
    }

    #[test]
    fn test_bob_positions() {
        use std::f64::consts::FRAC_PI_2;

        let pivot = DVec2::new(500.0, 400.0);
        let s = hanging(100.0, 50.0);
        let p = s.bob_positions(pivot);
        assert!((p.first - DVec2::new(500.0, 500.0)).length() < 1e-9);
        assert!((p.second - DVec2::new(500.0, 550.0)).length() < 1e-9);

        let mut s = s;
        s.theta1 = FRAC_PI_2;
        s.theta2 = -FRAC_PI_2;
        let p = s.bob_positions(pivot);
        assert!((p.first - DVec2::new(600.0, 400.0)).length() < 1e-9);
        assert!((p.second - DVec2::new(550.0, 400.0)).length() < 1e-9);
    }

    #[test]
    fn test_non_finite_detected() {
        let mut s = hanging(100.0, 100.0);
        assert!(s.is_finite());
        s.omega2 = f64::NAN;
        assert!(!s.is_finite());
        s.omega2 = 0.0;
        s.theta1 = f64::INFINITY;
        assert!(!s.is_finite());
    }
}
