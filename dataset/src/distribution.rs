use rand::Rng;
use rand_distr::{Distribution as _, Normal, Uniform};
use serde::{Deserialize, Serialize};

use crate::DatasetErrors;

/// A scalar random variable used to randomize one component of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Distribution {
    /// Always the same value.
    Fixed(f64),
    /// Uniform on the closed interval `[low, high]`.
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std: f64 },
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::Fixed(0.0)
    }
}

impl Distribution {
    pub fn validate(&self) -> Result<(), DatasetErrors> {
        match *self {
            Distribution::Fixed(value) => {
                if !value.is_finite() {
                    return Err(DatasetErrors::Distribution(format!(
                        "fixed value must be finite, got {value}"
                    )));
                }
            }
            Distribution::Uniform { low, high } => {
                Uniform::new_inclusive(low, high).map_err(|e| {
                    DatasetErrors::Distribution(format!("uniform [{low}, {high}]: {e}"))
                })?;
            }
            Distribution::Normal { mean, std } => {
                normal(mean, std)?;
            }
        }
        Ok(())
    }

    /// Draws one value. `Fixed` never touches the generator.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DatasetErrors> {
        match *self {
            Distribution::Fixed(value) => Ok(value),
            Distribution::Uniform { low, high } => {
                let dist = Uniform::new_inclusive(low, high).map_err(|e| {
                    DatasetErrors::Distribution(format!("uniform [{low}, {high}]: {e}"))
                })?;
                Ok(dist.sample(rng))
            }
            Distribution::Normal { mean, std } => Ok(normal(mean, std)?.sample(rng)),
        }
    }
}

/// `Normal::new` lets a negative standard deviation through, so it is checked here.
fn normal(mean: f64, std: f64) -> Result<Normal<f64>, DatasetErrors> {
    if !mean.is_finite() || !std.is_finite() || std < 0.0 {
        return Err(DatasetErrors::Distribution(format!(
            "normal ({mean}, {std}): mean must be finite and std finite and non-negative"
        )));
    }
    Normal::new(mean, std)
        .map_err(|e| DatasetErrors::Distribution(format!("normal ({mean}, {std}): {e}")))
}
