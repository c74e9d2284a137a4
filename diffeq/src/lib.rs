use std::fmt::Debug;

use thiserror::Error;

/// Submodules for core ODE system components.
pub mod input;
pub mod rk;
pub mod saving;
pub mod solvers;
pub mod state;
pub mod stepping;
pub mod tableau;

pub use input::{InputSource, Unforced};
pub use saving::Trajectory;
pub use solvers::{FixedStepSolver, RungeKuttaMethods};
pub use state::Integrable;
pub use stepping::FixedStepControl;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiffEqErrors {
    #[error("step size must be finite and greater than zero, got {0}")]
    InvalidStepSize(f64),
    #[error("state component {index} is not finite at t = {t}")]
    NonFinite { t: f64, index: usize },
    #[error("input source exhausted at step {step} ({available} inputs available)")]
    InputExhausted { step: usize, available: usize },
    #[error("unknown integration method '{0}'")]
    UnknownMethod(String),
}

/// Trait for defining a dynamical system model that can be numerically integrated.
///
/// Types implementing this trait must define how to compute the derivative (or RHS function)
/// of the ODE at a given time, state and externally applied input. The evaluation takes
/// `&self`, so a model can never observe or depend on integration history; the solver is
/// free to call it any number of times per step.
pub trait OdeModel: Debug {
    type State: Integrable;
    /// Input held constant over one step, `()` for autonomous models.
    type Input: Copy + Debug + Default;
    type Error: std::error::Error + From<DiffEqErrors>;

    /// Compute the derivative at time `t` and state `state` under `input`, storing the result in `derivative`.
    fn f(
        &self,
        t: f64,
        state: &Self::State,
        input: Self::Input,
        derivative: &mut Self::State,
    ) -> Result<(), Self::Error>;
}
