//! Fixed-step integration

use super::pendulum::{PendulumState, derivative};

/// One classical 4th-order Runge-Kutta step of size `h`.
///
/// Rod lengths pass through unchanged. The result may be non-finite; callers
/// check with [`PendulumState::is_finite`] and discard it wholesale.
pub fn rk4_step(s: &PendulumState, h: f64) -> PendulumState {
    let k1 = derivative(s);
    let k2 = derivative(&s.offset(&k1, h * 0.5));
    let k3 = derivative(&s.offset(&k2, h * 0.5));
    let k4 = derivative(&s.offset(&k3, h));

    let w = h / 6.0;
    PendulumState {
        theta1: s.theta1 + w * (k1.dtheta1 + 2.0 * k2.dtheta1 + 2.0 * k3.dtheta1 + k4.dtheta1),
        theta2: s.theta2 + w * (k1.dtheta2 + 2.0 * k2.dtheta2 + 2.0 * k3.dtheta2 + k4.dtheta2),
        omega1: s.omega1 + w * (k1.domega1 + 2.0 * k2.domega1 + 2.0 * k3.domega1 + k4.domega1),
        omega2: s.omega2 + w * (k1.domega2 + 2.0 * k2.domega2 + 2.0 * k3.domega2 + k4.domega2),
        l1: s.l1,
        l2: s.l2,
    }
}
