use crate::{
    parameters::{CartPendulumParameters, DoublePendulumParameters},
    state::{CartPendulumState, DoublePendulumState},
};

/// Mechanical energy split into kinetic and potential parts (J).
///
/// Potential energy is measured from the height of the pivot, so it is negative
/// whenever the bobs hang below it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Energy {
    pub kinetic: f64,
    pub potential: f64,
}

impl Energy {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

pub fn double_pendulum_energy(p: &DoublePendulumParameters, x: &DoublePendulumState) -> Energy {
    let m12 = p.m1 + p.m2;
    let kinetic = 0.5 * m12 * p.l1 * p.l1 * x.omega1 * x.omega1
        + 0.5 * p.m2 * p.l2 * p.l2 * x.omega2 * x.omega2
        + p.m2 * p.l1 * p.l2 * x.omega1 * x.omega2 * (x.theta1 - x.theta2).cos();
    let potential = -m12 * p.g * p.l1 * x.theta1.cos() - p.m2 * p.g * p.l2 * x.theta2.cos();
    Energy { kinetic, potential }
}

pub fn cart_pendulum_energy(p: &CartPendulumParameters, x: &CartPendulumState) -> Energy {
    let m12 = p.m1 + p.m2;
    let total_mass = p.cart_mass + m12;
    let kinetic = 0.5 * total_mass * x.vx * x.vx
        + m12 * p.l1 * x.theta1.cos() * x.vx * x.omega1
        + p.m2 * p.l2 * x.theta2.cos() * x.vx * x.omega2
        + 0.5 * m12 * p.l1 * p.l1 * x.omega1 * x.omega1
        + 0.5 * p.m2 * p.l2 * p.l2 * x.omega2 * x.omega2
        + p.m2 * p.l1 * p.l2 * x.omega1 * x.omega2 * (x.theta1 - x.theta2).cos();
    let potential = -m12 * p.g * p.l1 * x.theta1.cos() - p.m2 * p.g * p.l2 * x.theta2.cos();
    Energy { kinetic, potential }
}
