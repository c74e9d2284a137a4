use crate::DiffEqErrors;

/// Default step size, 100 Hz.
pub const DEFAULT_DT: f64 = 0.01;

// absorbs representation error when a duration is an integer multiple of dt (5.0 / 0.01)
const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Fixed-step control configuration.
///
/// The step size is validated once on construction and stays constant for the
/// whole integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedStepControl {
    dt: f64,
}

impl Default for FixedStepControl {
    fn default() -> Self {
        Self { dt: DEFAULT_DT }
    }
}

impl FixedStepControl {
    /// Constructs a new fixed-step controller with a given step size.
    pub fn new(dt: f64) -> Result<Self, DiffEqErrors> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(DiffEqErrors::InvalidStepSize(dt));
        }
        Ok(Self { dt })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of samples in `[0, duration)`, i.e. `ceil(duration / dt)`.
    pub fn steps_for(&self, duration: f64) -> usize {
        if !(duration > 0.0) {
            return 0;
        }
        (duration / self.dt - STEP_COUNT_EPSILON).ceil() as usize
    }

    /// Time of sample `k`. Computed by multiplication so it never accumulates roundoff.
    pub fn time(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }
}
