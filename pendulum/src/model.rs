use std::{fmt, str::FromStr};

use diffeq::{FixedStepSolver, Unforced};
use serde::{Deserialize, Serialize};

use crate::{
    PendulumErrors,
    cart::{CartTrajectory, DoublePendulumOnCart},
    control::ControlSequence,
    double_pendulum::{DoublePendulum, PendulumTrajectory},
    state::{CartPendulumState, DoublePendulumState},
};

/// Which of the two systems to simulate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Double pendulum on a fixed pivot.
    #[default]
    Pendulum,
    /// Double pendulum hanging from a force-driven cart.
    PendulumCart,
}

impl ModelKind {
    pub const ALL: [Self; 2] = [Self::Pendulum, Self::PendulumCart];

    /// Number of state components of the model.
    pub fn state_dim(&self) -> usize {
        match self {
            ModelKind::Pendulum => DoublePendulumState::DIM,
            ModelKind::PendulumCart => CartPendulumState::DIM,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Pendulum => write!(f, "pendulum"),
            ModelKind::PendulumCart => write!(f, "pendulum_cart"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = PendulumErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PendulumErrors::UnknownModel(s.to_string()))
    }
}

/// One of the two supported systems, ready to integrate.
#[derive(Clone, Debug)]
pub enum Model {
    Pendulum(DoublePendulum),
    PendulumOnCart(DoublePendulumOnCart),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Pendulum(_) => ModelKind::Pendulum,
            Model::PendulumOnCart(_) => ModelKind::PendulumCart,
        }
    }

    /// Integrates `n_steps` samples from `x0`.
    ///
    /// `control` drives the cart and defaults to zero force; the fixed-pivot pendulum has no
    /// input and ignores it. The initial state must belong to the same system as the model.
    pub fn simulate(
        &self,
        x0: &InitialState,
        solver: &FixedStepSolver,
        n_steps: usize,
        control: Option<&mut ControlSequence>,
    ) -> Result<SimulationOutput, PendulumErrors> {
        match (self, x0) {
            (Model::Pendulum(model), InitialState::Pendulum(x0)) => Ok(SimulationOutput::Pendulum(
                model.simulate(x0, solver, n_steps)?,
            )),
            (Model::PendulumOnCart(model), InitialState::PendulumOnCart(x0)) => {
                let trajectory = match control {
                    Some(control) => model.simulate(x0, solver, n_steps, control)?,
                    None => model.simulate(x0, solver, n_steps, &mut Unforced)?,
                };
                Ok(SimulationOutput::PendulumOnCart(trajectory))
            }
            (model, state) => Err(PendulumErrors::ModelMismatch {
                model: model.kind(),
                state: state.kind(),
            }),
        }
    }
}

impl From<DoublePendulum> for Model {
    fn from(model: DoublePendulum) -> Self {
        Model::Pendulum(model)
    }
}

impl From<DoublePendulumOnCart> for Model {
    fn from(model: DoublePendulumOnCart) -> Self {
        Model::PendulumOnCart(model)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InitialState {
    Pendulum(DoublePendulumState),
    PendulumOnCart(CartPendulumState),
}

impl InitialState {
    pub fn kind(&self) -> ModelKind {
        match self {
            InitialState::Pendulum(_) => ModelKind::Pendulum,
            InitialState::PendulumOnCart(_) => ModelKind::PendulumCart,
        }
    }

    /// The pendulum part of the state.
    pub fn pendulum(&self) -> DoublePendulumState {
        match self {
            InitialState::Pendulum(x) => *x,
            InitialState::PendulumOnCart(x) => x.pendulum(),
        }
    }
}

impl From<DoublePendulumState> for InitialState {
    fn from(x: DoublePendulumState) -> Self {
        InitialState::Pendulum(x)
    }
}

impl From<CartPendulumState> for InitialState {
    fn from(x: CartPendulumState) -> Self {
        InitialState::PendulumOnCart(x)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimulationOutput {
    Pendulum(PendulumTrajectory),
    PendulumOnCart(CartTrajectory),
}

impl SimulationOutput {
    pub fn kind(&self) -> ModelKind {
        match self {
            SimulationOutput::Pendulum(_) => ModelKind::Pendulum,
            SimulationOutput::PendulumOnCart(_) => ModelKind::PendulumCart,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SimulationOutput::Pendulum(trajectory) => trajectory.len(),
            SimulationOutput::PendulumOnCart(trajectory) => trajectory.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn times(&self) -> &[f64] {
        match self {
            SimulationOutput::Pendulum(trajectory) => trajectory.times(),
            SimulationOutput::PendulumOnCart(trajectory) => trajectory.times(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CartPendulumParameters, DoublePendulumParameters};
    use diffeq::{FixedStepControl, RungeKuttaMethods};

    fn solver() -> FixedStepSolver {
        FixedStepSolver::new(RungeKuttaMethods::Rk4, FixedStepControl::new(0.01).unwrap())
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.to_string().parse::<ModelKind>(), Ok(kind));
        }
        assert_eq!(
            "triple".parse::<ModelKind>(),
            Err(PendulumErrors::UnknownModel("triple".to_string()))
        );
    }

    #[test]
    fn test_mismatched_state_is_rejected() {
        let model = Model::from(DoublePendulum::new(DoublePendulumParameters::default()).unwrap());
        let x0 = InitialState::from(CartPendulumState::default());
        assert_eq!(
            model.simulate(&x0, &solver(), 10, None),
            Err(PendulumErrors::ModelMismatch {
                model: ModelKind::Pendulum,
                state: ModelKind::PendulumCart,
            })
        );
    }

    #[test]
    fn test_cart_without_control_is_unforced() {
        let model =
            Model::from(DoublePendulumOnCart::new(CartPendulumParameters::default()).unwrap());
        let x0 = InitialState::from(CartPendulumState::new(0.0, 0.0, 0.5, 0.0, -0.2, 0.0));
        let unforced = model.simulate(&x0, &solver(), 50, None).unwrap();
        let mut zeros = ControlSequence::zeros(50);
        let forced = model.simulate(&x0, &solver(), 50, Some(&mut zeros)).unwrap();
        assert_eq!(unforced, forced);
        assert_eq!(unforced.len(), 50);
        assert_eq!(unforced.kind(), ModelKind::PendulumCart);
    }
}
