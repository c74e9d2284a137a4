use diffeq::{
    FixedStepControl, FixedStepSolver, Integrable, OdeModel, RungeKuttaMethods, Trajectory,
    Unforced,
};

use crate::{
    PendulumErrors,
    energy::{self, Energy},
    kinematics::{self, LinkPositions},
    parameters::DoublePendulumParameters,
    state::DoublePendulumState,
};

pub type PendulumTrajectory = Trajectory<DoublePendulumState, ()>;

/// A frictionless double pendulum: point masses on massless rods hanging from a fixed pivot.
///
/// The parameters are validated once on construction and cannot change afterwards,
/// so one model can be shared by any number of concurrent runs.
#[derive(Clone, Debug)]
pub struct DoublePendulum {
    parameters: DoublePendulumParameters,
}

impl DoublePendulum {
    pub fn new(parameters: DoublePendulumParameters) -> Result<Self, PendulumErrors> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &DoublePendulumParameters {
        &self.parameters
    }

    /// The shared denominator of both angular accelerations divided by its largest
    /// possible value `(m1 + m2) * l1`. Equals `(m1 + m2 sin^2(theta2 - theta1)) / (m1 + m2)`.
    pub fn denominator_ratio(&self, state: &DoublePendulumState) -> f64 {
        let p = &self.parameters;
        let cos_delta = (state.theta2 - state.theta1).cos();
        let total = p.m1 + p.m2;
        (total * p.l1 - p.m2 * p.l1 * cos_delta * cos_delta) / (total * p.l1)
    }

    /// Instantaneous time derivative `(omega1, alpha1, omega2, alpha2)` of `state`.
    pub fn evaluate_derivative(
        &self,
        state: &DoublePendulumState,
    ) -> Result<DoublePendulumState, PendulumErrors> {
        let mut derivative = DoublePendulumState::default();
        self.f(0.0, state, (), &mut derivative)?;
        Ok(derivative)
    }

    /// Advances `state` by `dt` with the default fixed-step scheme.
    pub fn step(
        &self,
        state: &DoublePendulumState,
        dt: f64,
    ) -> Result<DoublePendulumState, PendulumErrors> {
        let solver = FixedStepSolver::new(RungeKuttaMethods::default(), FixedStepControl::new(dt)?);
        solver.step(self, 0.0, state, ())
    }

    /// Records `n_steps` samples of free motion starting from `x0`.
    pub fn simulate(
        &self,
        x0: &DoublePendulumState,
        solver: &FixedStepSolver,
        n_steps: usize,
    ) -> Result<PendulumTrajectory, PendulumErrors> {
        solver.run(self, x0, n_steps, &mut Unforced)
    }

    pub fn energy(&self, state: &DoublePendulumState) -> Energy {
        energy::double_pendulum_energy(&self.parameters, state)
    }

    pub fn link_positions(&self, state: &DoublePendulumState) -> LinkPositions {
        kinematics::link_positions(
            self.parameters.l1,
            self.parameters.l2,
            0.0,
            state.theta1,
            state.theta2,
        )
    }
}

impl OdeModel for DoublePendulum {
    type State = DoublePendulumState;
    type Input = ();
    type Error = PendulumErrors;

    fn f(
        &self,
        t: f64,
        x: &DoublePendulumState,
        _input: (),
        dx: &mut DoublePendulumState,
    ) -> Result<(), PendulumErrors> {
        let p = &self.parameters;
        let total = p.m1 + p.m2;

        let (sin_delta, cos_delta) = (x.theta2 - x.theta1).sin_cos();
        let sin1 = x.theta1.sin();
        let sin2 = x.theta2.sin();
        let w1_sq = x.omega1 * x.omega1;
        let w2_sq = x.omega2 * x.omega2;

        let den1 = total * p.l1 - p.m2 * p.l1 * cos_delta * cos_delta;
        let ratio = den1 / (total * p.l1);
        if ratio < p.singularity_tolerance {
            return Err(PendulumErrors::SingularConfiguration {
                t,
                ratio,
                tolerance: p.singularity_tolerance,
            });
        }
        let den2 = (p.l2 / p.l1) * den1;

        dx.theta1 = x.omega1;
        dx.omega1 = (p.m2 * p.l1 * w1_sq * sin_delta * cos_delta
            + p.m2 * p.g * sin2 * cos_delta
            + p.m2 * p.l2 * w2_sq * sin_delta
            - total * p.g * sin1)
            / den1;
        dx.theta2 = x.omega2;
        dx.omega2 = (-p.m2 * p.l2 * w2_sq * sin_delta * cos_delta
            + total * (p.g * sin1 * cos_delta - p.l1 * w1_sq * sin_delta - p.g * sin2))
            / den2;

        if let Some(index) = dx.non_finite_index() {
            return Err(PendulumErrors::NumericOverflow { t, index });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn model() -> DoublePendulum {
        DoublePendulum::new(DoublePendulumParameters::default()).unwrap()
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = DoublePendulum::new(DoublePendulumParameters::default().with_masses(-1.0, 1.0));
        assert!(matches!(result, Err(PendulumErrors::InvalidParameters(_))));
    }

    /// Tests that the stable equilibrium has an exactly zero derivative.
    #[test]
    fn test_equilibrium_derivative_is_zero() {
        let dx = model()
            .evaluate_derivative(&DoublePendulumState::default())
            .unwrap();
        assert_eq!(dx.to_array(), [0.0; 4]);
    }

    /// With the links aligned and at rest the inner link accelerates as
    /// -g sin(theta) / l1 while the outer link starts with no angular acceleration.
    #[test]
    fn test_aligned_links_from_rest() {
        let theta = 0.4;
        let dx = model()
            .evaluate_derivative(&DoublePendulumState::new(theta, 0.0, theta, 0.0))
            .unwrap();
        assert_relative_eq!(dx.omega1, -9.8 * theta.sin(), epsilon = 1e-12);
        assert_eq!(dx.omega2, 0.0);
    }

    /// Tests the textbook values at theta1 = pi/2, theta2 = 0 from rest.
    #[test]
    fn test_horizontal_first_link() {
        let p = DoublePendulumParameters::default();
        let dx = model()
            .evaluate_derivative(&DoublePendulumState::new(PI / 2.0, 0.0, 0.0, 0.0))
            .unwrap();
        // cos(delta) = 0: den1 = (m1 + m2) l1, alpha1 = -(m1 + m2) g / den1
        assert_relative_eq!(dx.omega1, -p.g / p.l1, epsilon = 1e-12);
        assert_relative_eq!(dx.omega2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_is_finite_over_state_grid() {
        let model = model();
        let angles = [-7.0, -PI, -1.0, 0.0, 0.5, PI / 2.0, PI, 4.0, 12.0];
        let rates = [-20.0, -1.0, 0.0, 3.0, 20.0];
        for theta1 in angles {
            for theta2 in angles {
                for omega in rates {
                    let x = DoublePendulumState::new(theta1, omega, theta2, -omega);
                    let dx = model.evaluate_derivative(&x).unwrap();
                    assert!(dx.is_finite(), "non-finite derivative at {x:?}");
                    assert_eq!(dx.theta1, x.omega1);
                    assert_eq!(dx.theta2, x.omega2);
                }
            }
        }
    }

    /// A vanishing first mass makes the shared denominator vanish for aligned links.
    #[test]
    fn test_singular_configuration_detected() {
        let model = DoublePendulum::new(DoublePendulumParameters::default().with_masses(1e-12, 1.0))
            .unwrap();
        let aligned = DoublePendulumState::new(0.3, 0.0, 0.3, 1.0);
        assert!(model.denominator_ratio(&aligned) < 1e-9);
        assert!(matches!(
            model.evaluate_derivative(&aligned),
            Err(PendulumErrors::SingularConfiguration { .. })
        ));

        // the same masses are fine when the links are not aligned
        let bent = DoublePendulumState::new(0.3, 0.0, 0.3 + PI / 2.0, 1.0);
        assert!(model.evaluate_derivative(&bent).is_ok());
    }

    #[test]
    fn test_step_does_not_wrap_angles() {
        let model = model();
        let x = DoublePendulumState::new(PI - 1e-3, 50.0, -PI + 1e-3, -50.0);
        let y = model.step(&x, 0.01).unwrap();
        assert!(y.theta1 > PI);
        assert!(y.theta2 < -PI);
    }

    #[test]
    fn test_step_rejects_invalid_dt() {
        let result = model().step(&DoublePendulumState::default(), 0.0);
        assert!(matches!(result, Err(PendulumErrors::Integration(_))));
    }
}
