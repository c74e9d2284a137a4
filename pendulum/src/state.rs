use std::ops::{AddAssign, MulAssign};

use diffeq::Integrable;
use serde::{Deserialize, Serialize};

/// State of a double pendulum. Angles are measured from the downward vertical and are
/// never wrapped into `[-pi, pi)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DoublePendulumState {
    /// Angle of the first rod (rad).
    pub theta1: f64,
    /// Angular velocity of the first rod (rad/s).
    pub omega1: f64,
    /// Angle of the second rod (rad).
    pub theta2: f64,
    /// Angular velocity of the second rod (rad/s).
    pub omega2: f64,
}

impl DoublePendulumState {
    pub const DIM: usize = 4;

    pub fn new(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self {
            theta1,
            omega1,
            theta2,
            omega2,
        }
    }

    /// Builds a state from angles in degrees and angular velocities in degrees per second.
    pub fn from_degrees(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self::new(
            theta1.to_radians(),
            omega1.to_radians(),
            theta2.to_radians(),
            omega2.to_radians(),
        )
    }

    /// Components in `(theta1, omega1, theta2, omega2)` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.theta1, self.omega1, self.theta2, self.omega2]
    }
}

impl From<[f64; 4]> for DoublePendulumState {
    fn from(x: [f64; 4]) -> Self {
        Self::new(x[0], x[1], x[2], x[3])
    }
}

impl AddAssign<&Self> for DoublePendulumState {
    fn add_assign(&mut self, rhs: &Self) {
        self.theta1 += rhs.theta1;
        self.omega1 += rhs.omega1;
        self.theta2 += rhs.theta2;
        self.omega2 += rhs.omega2;
    }
}

impl MulAssign<f64> for DoublePendulumState {
    fn mul_assign(&mut self, rhs: f64) {
        self.theta1 *= rhs;
        self.omega1 *= rhs;
        self.theta2 *= rhs;
        self.omega2 *= rhs;
    }
}

impl Integrable for DoublePendulumState {
    fn non_finite_index(&self) -> Option<usize> {
        self.to_array().iter().position(|x| !x.is_finite())
    }
}

/// State of a double pendulum hanging from a cart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartPendulumState {
    /// Horizontal cart position (m).
    pub x: f64,
    /// Horizontal cart velocity (m/s).
    pub vx: f64,
    /// Angle of the first rod (rad).
    pub theta1: f64,
    /// Angular velocity of the first rod (rad/s).
    pub omega1: f64,
    /// Angle of the second rod (rad).
    pub theta2: f64,
    /// Angular velocity of the second rod (rad/s).
    pub omega2: f64,
}

impl CartPendulumState {
    pub const DIM: usize = 6;

    pub fn new(x: f64, vx: f64, theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self {
            x,
            vx,
            theta1,
            omega1,
            theta2,
            omega2,
        }
    }

    /// A cart state at `x`, `vx` carrying the given pendulum configuration.
    pub fn from_pendulum(x: f64, vx: f64, pendulum: DoublePendulumState) -> Self {
        Self::new(
            x,
            vx,
            pendulum.theta1,
            pendulum.omega1,
            pendulum.theta2,
            pendulum.omega2,
        )
    }

    /// The pendulum part of the state.
    pub fn pendulum(&self) -> DoublePendulumState {
        DoublePendulumState::new(self.theta1, self.omega1, self.theta2, self.omega2)
    }

    /// Components in `(x, vx, theta1, omega1, theta2, omega2)` order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.x,
            self.vx,
            self.theta1,
            self.omega1,
            self.theta2,
            self.omega2,
        ]
    }
}

impl From<[f64; 6]> for CartPendulumState {
    fn from(x: [f64; 6]) -> Self {
        Self::new(x[0], x[1], x[2], x[3], x[4], x[5])
    }
}

impl AddAssign<&Self> for CartPendulumState {
    fn add_assign(&mut self, rhs: &Self) {
        self.x += rhs.x;
        self.vx += rhs.vx;
        self.theta1 += rhs.theta1;
        self.omega1 += rhs.omega1;
        self.theta2 += rhs.theta2;
        self.omega2 += rhs.omega2;
    }
}

impl MulAssign<f64> for CartPendulumState {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.vx *= rhs;
        self.theta1 *= rhs;
        self.omega1 *= rhs;
        self.theta2 *= rhs;
        self.omega2 *= rhs;
    }
}

impl Integrable for CartPendulumState {
    fn non_finite_index(&self) -> Option<usize> {
        self.to_array().iter().position(|x| !x.is_finite())
    }
}
