use crate::DiffEqErrors;

/// Supplies the input applied over each step of a fixed-step integration.
///
/// The value returned for step `k` is held constant over `[t_k, t_k + dt)`.
pub trait InputSource<Input> {
    fn input(&mut self, step: usize, t: f64) -> Result<Input, DiffEqErrors>;
}

/// Input source for free (unforced) motion; always yields `Input::default()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unforced;

impl<Input: Default> InputSource<Input> for Unforced {
    fn input(&mut self, _step: usize, _t: f64) -> Result<Input, DiffEqErrors> {
        Ok(Input::default())
    }
}

/// A precomputed schedule with one input per step.
impl<Input: Copy> InputSource<Input> for [Input] {
    fn input(&mut self, step: usize, _t: f64) -> Result<Input, DiffEqErrors> {
        self.get(step)
            .copied()
            .ok_or(DiffEqErrors::InputExhausted {
                step,
                available: self.len(),
            })
    }
}

impl<Input: Copy> InputSource<Input> for Vec<Input> {
    fn input(&mut self, step: usize, t: f64) -> Result<Input, DiffEqErrors> {
        self.as_mut_slice().input(step, t)
    }
}
