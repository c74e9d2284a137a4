use std::array;

use crate::{OdeModel, tableau::ButcherTableau};

/// A single-step explicit Runge-Kutta integrator driven by a Butcher tableau.
///
/// The integrator holds no state between steps; every call to [`RungeKutta::step`]
/// allocates its own stage buffers, so one instance can be shared across threads.
pub struct RungeKutta<const STAGES: usize> {
    tableau: ButcherTableau<STAGES>,
}

impl<const STAGES: usize> RungeKutta<STAGES> {
    pub const fn new(tableau: ButcherTableau<STAGES>) -> Self {
        Self { tableau }
    }

    pub fn order(&self) -> usize {
        self.tableau.order
    }

    /// Advances `x` from `t` to `t + h` with `input` held constant over every stage.
    pub fn step<Model: OdeModel>(
        &self,
        model: &Model,
        t: f64,
        x: &Model::State,
        input: Model::Input,
        h: f64,
    ) -> Result<Model::State, Model::Error> {
        let mut k: [Model::State; STAGES] = array::from_fn(|_| Model::State::default());
        let mut stage = Model::State::default();
        let mut scaled = Model::State::default();

        // k0
        model.f(t, x, input, &mut k[0])?;

        // k1 - ks
        for s in 1..STAGES {
            // intermediate point from previous ks with appropriate scaling from tableau
            stage.clone_from(x);
            for i in 0..s {
                let a = self.tableau.a[s][i];
                if a == 0.0 {
                    continue;
                }
                scaled.clone_from(&k[i]);
                scaled *= a * h;
                stage += &scaled;
            }
            model.f(t + self.tableau.c[s] * h, &stage, input, &mut k[s])?;
        }

        let mut y = x.clone();
        for s in 0..STAGES {
            let b = self.tableau.b[s];
            if b == 0.0 {
                continue;
            }
            scaled.clone_from(&k[s]);
            scaled *= b * h;
            y += &scaled;
        }
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffEqErrors, state::state_array::StateArray};
    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct Decay;

    impl OdeModel for Decay {
        type State = StateArray<1>;
        type Input = ();
        type Error = DiffEqErrors;

        fn f(
            &self,
            _t: f64,
            x: &StateArray<1>,
            _input: (),
            dx: &mut StateArray<1>,
        ) -> Result<(), DiffEqErrors> {
            dx[0] = -x[0];
            Ok(())
        }
    }

    /// Tests that one Euler step is exactly x + h f(x).
    #[test]
    fn test_euler_single_step() {
        let solver = RungeKutta::new(ButcherTableau::<1>::EULER);
        let y = solver
            .step(&Decay, 0.0, &StateArray::new([1.0]), (), 0.1)
            .unwrap();
        assert_eq!(y[0], 0.9);
    }

    /// Tests that one RK4 step matches the 4th order Taylor polynomial of exp(-h).
    #[test]
    fn test_rk4_single_step() {
        let solver = RungeKutta::new(ButcherTableau::<4>::RK4);
        let h: f64 = 0.1;
        let y = solver
            .step(&Decay, 0.0, &StateArray::new([1.0]), (), h)
            .unwrap();
        let taylor = 1.0 - h + h.powi(2) / 2.0 - h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert_relative_eq!(y[0], taylor, max_relative = 1e-14);
        assert_eq!(solver.order(), 4);
    }

    /// Tests that a midpoint step uses the half-step slope.
    #[test]
    fn test_midpoint_single_step() {
        let solver = RungeKutta::new(ButcherTableau::<2>::MIDPOINT);
        let h = 0.1;
        let y = solver
            .step(&Decay, 0.0, &StateArray::new([1.0]), (), h)
            .unwrap();
        // k1 = -1, k2 = -(1 - h/2)
        assert_relative_eq!(y[0], 1.0 - h * (1.0 - h / 2.0), max_relative = 1e-15);
    }
}
