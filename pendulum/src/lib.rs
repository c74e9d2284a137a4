use diffeq::DiffEqErrors;
use thiserror::Error;

pub mod cart;
pub mod control;
pub mod double_pendulum;
pub mod energy;
pub mod kinematics;
pub mod model;
pub mod parameters;
pub mod state;

pub use cart::{CartTrajectory, DoublePendulumOnCart};
pub use control::ControlSequence;
pub use double_pendulum::{DoublePendulum, PendulumTrajectory};
pub use model::{InitialState, Model, ModelKind, SimulationOutput};
pub use parameters::{CartPendulumParameters, DoublePendulumParameters};
pub use state::{CartPendulumState, DoublePendulumState};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PendulumErrors {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error(
        "singular configuration at t = {t}: normalized denominator {ratio:e} is below tolerance {tolerance:e}"
    )]
    SingularConfiguration { t: f64, ratio: f64, tolerance: f64 },
    #[error("numeric overflow at t = {t}: component {index} is not finite")]
    NumericOverflow { t: f64, index: usize },
    #[error("a {model} model cannot start from a {state} initial state")]
    ModelMismatch { model: ModelKind, state: ModelKind },
    #[error("unknown model '{0}', expected 'pendulum' or 'pendulum_cart'")]
    UnknownModel(String),
    #[error(transparent)]
    Integration(DiffEqErrors),
}

impl From<DiffEqErrors> for PendulumErrors {
    fn from(error: DiffEqErrors) -> Self {
        match error {
            DiffEqErrors::NonFinite { t, index } => PendulumErrors::NumericOverflow { t, index },
            other => PendulumErrors::Integration(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_state_maps_to_overflow() {
        let error = PendulumErrors::from(DiffEqErrors::NonFinite { t: 1.5, index: 2 });
        assert_eq!(error, PendulumErrors::NumericOverflow { t: 1.5, index: 2 });
        let error = PendulumErrors::from(DiffEqErrors::InvalidStepSize(0.0));
        assert_eq!(
            error,
            PendulumErrors::Integration(DiffEqErrors::InvalidStepSize(0.0))
        );
    }
}
