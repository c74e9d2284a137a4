use diffeq::{
    FixedStepControl, FixedStepSolver, InputSource, Integrable, OdeModel, RungeKuttaMethods,
    Trajectory,
};
use nalgebra::{Matrix3, Vector3};

use crate::{
    PendulumErrors,
    energy::{self, Energy},
    kinematics::{self, LinkPositions},
    parameters::CartPendulumParameters,
    state::CartPendulumState,
};

pub type CartTrajectory = Trajectory<CartPendulumState, f64>;

/// A double pendulum hanging from a cart that rolls on an unbounded horizontal rail.
///
/// The horizontal force on the cart is the model input. The generalized accelerations
/// `(x, theta1, theta2)` solve `M(q) qdd = rhs(q, qd, force)` with the Lagrangian mass matrix.
#[derive(Clone, Debug)]
pub struct DoublePendulumOnCart {
    parameters: CartPendulumParameters,
}

impl DoublePendulumOnCart {
    pub fn new(parameters: CartPendulumParameters) -> Result<Self, PendulumErrors> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &CartPendulumParameters {
        &self.parameters
    }

    fn mass_matrix(&self, state: &CartPendulumState) -> Matrix3<f64> {
        let p = &self.parameters;
        let m12 = p.m1 + p.m2;
        let c1 = state.theta1.cos();
        let c2 = state.theta2.cos();
        let c12 = (state.theta1 - state.theta2).cos();

        let a = p.cart_mass + m12;
        let b = m12 * p.l1 * c1;
        let c = p.m2 * p.l2 * c2;
        let d = m12 * p.l1 * p.l1;
        let e = p.m2 * p.l1 * p.l2 * c12;
        let f = p.m2 * p.l2 * p.l2;
        Matrix3::new(a, b, c, b, d, e, c, e, f)
    }

    /// Determinant of the mass matrix divided by the product of its diagonal.
    ///
    /// Lies in `(0, 1]` for physical parameters and drops towards zero as the matrix
    /// approaches rank deficiency.
    pub fn denominator_ratio(&self, state: &CartPendulumState) -> f64 {
        let mass = self.mass_matrix(state);
        mass.determinant() / (mass[(0, 0)] * mass[(1, 1)] * mass[(2, 2)])
    }

    /// Instantaneous time derivative `(vx, ax, omega1, alpha1, omega2, alpha2)` of `state`
    /// under the horizontal `force` on the cart.
    pub fn evaluate_derivative(
        &self,
        state: &CartPendulumState,
        force: f64,
    ) -> Result<CartPendulumState, PendulumErrors> {
        let mut derivative = CartPendulumState::default();
        self.f(0.0, state, force, &mut derivative)?;
        Ok(derivative)
    }

    /// Advances `state` by `dt` with the default fixed-step scheme, holding `force`.
    pub fn step(
        &self,
        state: &CartPendulumState,
        dt: f64,
        force: f64,
    ) -> Result<CartPendulumState, PendulumErrors> {
        let solver = FixedStepSolver::new(RungeKuttaMethods::default(), FixedStepControl::new(dt)?);
        solver.step(self, 0.0, state, force)
    }

    /// Records `n_steps` samples starting from `x0`, with `forces` supplying the cart force
    /// held over each step.
    pub fn simulate<Forces>(
        &self,
        x0: &CartPendulumState,
        solver: &FixedStepSolver,
        n_steps: usize,
        forces: &mut Forces,
    ) -> Result<CartTrajectory, PendulumErrors>
    where
        Forces: InputSource<f64> + ?Sized,
    {
        solver.run(self, x0, n_steps, forces)
    }

    pub fn energy(&self, state: &CartPendulumState) -> Energy {
        energy::cart_pendulum_energy(&self.parameters, state)
    }

    pub fn link_positions(&self, state: &CartPendulumState) -> LinkPositions {
        kinematics::link_positions(
            self.parameters.l1,
            self.parameters.l2,
            state.x,
            state.theta1,
            state.theta2,
        )
    }
}

impl OdeModel for DoublePendulumOnCart {
    type State = CartPendulumState;
    type Input = f64;
    type Error = PendulumErrors;

    fn f(
        &self,
        t: f64,
        x: &CartPendulumState,
        force: f64,
        dx: &mut CartPendulumState,
    ) -> Result<(), PendulumErrors> {
        let p = &self.parameters;
        let m12 = p.m1 + p.m2;
        let s1 = x.theta1.sin();
        let s2 = x.theta2.sin();
        let s12 = (x.theta1 - x.theta2).sin();
        let w1_sq = x.omega1 * x.omega1;
        let w2_sq = x.omega2 * x.omega2;

        let mass = self.mass_matrix(x);
        let ratio = mass.determinant() / (mass[(0, 0)] * mass[(1, 1)] * mass[(2, 2)]);
        let singular = PendulumErrors::SingularConfiguration {
            t,
            ratio,
            tolerance: p.singularity_tolerance,
        };
        if ratio < p.singularity_tolerance {
            return Err(singular);
        }

        let rhs = Vector3::new(
            force - p.cart_damping * x.vx + m12 * p.l1 * w1_sq * s1 + p.m2 * p.l2 * w2_sq * s2,
            -p.m2 * p.l1 * p.l2 * w2_sq * s12 - m12 * p.g * p.l1 * s1,
            p.m2 * p.l1 * p.l2 * w1_sq * s12 - p.m2 * p.g * p.l2 * s2,
        );
        let Some(acceleration) = mass.lu().solve(&rhs) else {
            return Err(singular);
        };

        dx.x = x.vx;
        dx.vx = acceleration[0];
        dx.theta1 = x.omega1;
        dx.omega1 = acceleration[1];
        dx.theta2 = x.omega2;
        dx.omega2 = acceleration[2];

        if let Some(index) = dx.non_finite_index() {
            return Err(PendulumErrors::NumericOverflow { t, index });
        }
        Ok(())
    }
}
