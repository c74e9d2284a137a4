use diffeq::{DiffEqErrors, InputSource};

/// Horizontal cart forces, one per integration step (N).
///
/// The force for step `k` is held constant over `[t_k, t_k + dt)`, including every
/// intermediate stage of a multi-stage scheme.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlSequence {
    forces: Vec<f64>,
}

impl ControlSequence {
    pub fn new(forces: Vec<f64>) -> Self {
        Self { forces }
    }

    pub fn zeros(n_steps: usize) -> Self {
        Self::new(vec![0.0; n_steps])
    }

    /// Piecewise-constant forces: each level is repeated for `hold_steps` steps, and the
    /// sequence is cut or padded with the last level to exactly `n_steps` entries.
    ///
    /// Empty `levels` or a zero `hold_steps` yield an all-zero sequence.
    pub fn staircase(levels: &[f64], hold_steps: usize, n_steps: usize) -> Self {
        let Some(&last) = levels.last() else {
            return Self::zeros(n_steps);
        };
        if hold_steps == 0 {
            return Self::zeros(n_steps);
        }
        let forces = (0..n_steps)
            .map(|k| levels.get(k / hold_steps).copied().unwrap_or(last))
            .collect();
        Self { forces }
    }

    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }
}

impl From<Vec<f64>> for ControlSequence {
    fn from(forces: Vec<f64>) -> Self {
        Self::new(forces)
    }
}

impl InputSource<f64> for ControlSequence {
    fn input(&mut self, step: usize, t: f64) -> Result<f64, DiffEqErrors> {
        self.forces.input(step, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staircase_holds_levels() {
        let control = ControlSequence::staircase(&[1.0, -2.0, 3.0], 2, 7);
        assert_eq!(control.forces(), &[1.0, 1.0, -2.0, -2.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_staircase_truncates() {
        let control = ControlSequence::staircase(&[1.0, -2.0, 3.0], 100, 5);
        assert_eq!(control.forces(), &[1.0; 5]);
    }

    #[test]
    fn test_degenerate_staircase_is_zero() {
        assert_eq!(ControlSequence::staircase(&[], 10, 3), ControlSequence::zeros(3));
        assert_eq!(ControlSequence::staircase(&[4.0], 0, 3), ControlSequence::zeros(3));
    }

    #[test]
    fn test_short_sequence_exhausts() {
        let mut control = ControlSequence::new(vec![0.5]);
        assert_eq!(control.input(0, 0.0), Ok(0.5));
        assert_eq!(
            control.input(1, 0.01),
            Err(DiffEqErrors::InputExhausted { step: 1, available: 1 })
        );
    }
}
