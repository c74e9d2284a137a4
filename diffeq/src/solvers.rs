use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    DiffEqErrors, OdeModel,
    input::InputSource,
    rk::RungeKutta,
    saving::Trajectory,
    state::Integrable,
    stepping::FixedStepControl,
    tableau::ButcherTableau,
};

/// Enum representing the fixed-stage explicit schemes supported by the framework.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RungeKuttaMethods {
    /// Forward Euler, 1st order.
    Euler,
    /// Explicit midpoint, 2nd order.
    Midpoint,
    /// Heun's method (explicit trapezoid), 2nd order.
    Heun,
    /// Ralston's minimum-error 2nd order method.
    Ralston,
    /// Classical Runge-Kutta 4th-order method.
    #[default]
    Rk4,
}

impl RungeKuttaMethods {
    pub const ALL: [Self; 5] = [
        Self::Euler,
        Self::Midpoint,
        Self::Heun,
        Self::Ralston,
        Self::Rk4,
    ];

    pub fn order(&self) -> usize {
        match self {
            RungeKuttaMethods::Euler => 1,
            RungeKuttaMethods::Midpoint | RungeKuttaMethods::Heun | RungeKuttaMethods::Ralston => 2,
            RungeKuttaMethods::Rk4 => 4,
        }
    }

    pub fn step<Model: OdeModel>(
        &self,
        model: &Model,
        t: f64,
        x: &Model::State,
        input: Model::Input,
        h: f64,
    ) -> Result<Model::State, Model::Error> {
        match self {
            RungeKuttaMethods::Euler => {
                RungeKutta::new(ButcherTableau::<1>::EULER).step(model, t, x, input, h)
            }
            RungeKuttaMethods::Midpoint => {
                RungeKutta::new(ButcherTableau::<2>::MIDPOINT).step(model, t, x, input, h)
            }
            RungeKuttaMethods::Heun => {
                RungeKutta::new(ButcherTableau::<2>::HEUN).step(model, t, x, input, h)
            }
            RungeKuttaMethods::Ralston => {
                RungeKutta::new(ButcherTableau::<2>::RALSTON).step(model, t, x, input, h)
            }
            RungeKuttaMethods::Rk4 => {
                RungeKutta::new(ButcherTableau::<4>::RK4).step(model, t, x, input, h)
            }
        }
    }
}

impl fmt::Display for RungeKuttaMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RungeKuttaMethods::Euler => "euler",
            RungeKuttaMethods::Midpoint => "midpoint",
            RungeKuttaMethods::Heun => "heun",
            RungeKuttaMethods::Ralston => "ralston",
            RungeKuttaMethods::Rk4 => "rk4",
        };
        write!(f, "{name}")
    }
}

impl FromStr for RungeKuttaMethods {
    type Err = DiffEqErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DiffEqErrors::UnknownMethod(s.to_string()))
    }
}

/// A fixed-step explicit solver: one scheme, one step size, applied identically every step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedStepSolver {
    method: RungeKuttaMethods,
    control: FixedStepControl,
}

impl FixedStepSolver {
    pub fn new(method: RungeKuttaMethods, control: FixedStepControl) -> Self {
        Self { method, control }
    }

    pub fn method(&self) -> RungeKuttaMethods {
        self.method
    }

    pub fn control(&self) -> &FixedStepControl {
        &self.control
    }

    pub fn dt(&self) -> f64 {
        self.control.dt()
    }

    /// Advances `x` from `t` by one step, failing if any component of the result is not finite.
    pub fn step<Model: OdeModel>(
        &self,
        model: &Model,
        t: f64,
        x: &Model::State,
        input: Model::Input,
    ) -> Result<Model::State, Model::Error> {
        let dt = self.control.dt();
        let y = self.method.step(model, t, x, input, dt)?;
        if let Some(index) = y.non_finite_index() {
            return Err(DiffEqErrors::NonFinite { t: t + dt, index }.into());
        }
        Ok(y)
    }

    /// Integrates `n_steps` samples starting from `x0`, drawing one input per step from `inputs`.
    ///
    /// The first error aborts the run; no partial trajectory is returned.
    pub fn run<Model, Inputs>(
        &self,
        model: &Model,
        x0: &Model::State,
        n_steps: usize,
        inputs: &mut Inputs,
    ) -> Result<Trajectory<Model::State, Model::Input>, Model::Error>
    where
        Model: OdeModel,
        Inputs: InputSource<Model::Input> + ?Sized,
    {
        if let Some(index) = x0.non_finite_index() {
            return Err(DiffEqErrors::NonFinite { t: 0.0, index }.into());
        }

        let mut trajectory = Trajectory::with_capacity(n_steps);
        let mut x = x0.clone();
        for k in 0..n_steps {
            let t = self.control.time(k);
            let u = inputs.input(k, t)?;
            // the final sample is recorded but never advanced
            let next = if k + 1 < n_steps {
                Some(self.step(model, t, &x, u)?)
            } else {
                None
            };
            trajectory.push(t, x, u);
            match next {
                Some(next) => x = next,
                None => break,
            }
        }
        Ok(trajectory)
    }
}
