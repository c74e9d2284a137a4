use pendulum::{CartPendulumState, ControlSequence, DoublePendulumState, InitialState, ModelKind};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DatasetErrors, distribution::Distribution};

/// Distributions of the initial state of each run.
///
/// Angles are drawn in degrees and angular rates in degrees per second, then converted
/// to radians. The cart components are in meters and only used for the cart model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditionSampler {
    pub theta1: Distribution,
    pub omega1: Distribution,
    pub theta2: Distribution,
    pub omega2: Distribution,
    pub x: Distribution,
    pub vx: Distribution,
}

impl Default for InitialConditionSampler {
    fn default() -> Self {
        let angle = Distribution::Uniform {
            low: 0.0,
            high: 360.0,
        };
        let rate = Distribution::Uniform {
            low: -180.0,
            high: 180.0,
        };
        Self {
            theta1: angle,
            omega1: rate,
            theta2: angle,
            omega2: rate,
            x: Distribution::Fixed(0.0),
            vx: Distribution::Fixed(0.0),
        }
    }
}

impl InitialConditionSampler {
    pub fn validate(&self) -> Result<(), DatasetErrors> {
        for dist in [
            &self.theta1,
            &self.omega1,
            &self.theta2,
            &self.omega2,
            &self.x,
            &self.vx,
        ] {
            dist.validate()?;
        }
        Ok(())
    }

    pub fn sample_pendulum<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<DoublePendulumState, DatasetErrors> {
        // both angles are drawn before the rates
        let theta1 = self.theta1.sample(rng)?;
        let theta2 = self.theta2.sample(rng)?;
        let omega1 = self.omega1.sample(rng)?;
        let omega2 = self.omega2.sample(rng)?;
        Ok(DoublePendulumState::from_degrees(
            theta1, omega1, theta2, omega2,
        ))
    }

    pub fn sample_cart<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<CartPendulumState, DatasetErrors> {
        let pendulum = self.sample_pendulum(rng)?;
        let x = self.x.sample(rng)?;
        let vx = self.vx.sample(rng)?;
        Ok(CartPendulumState::from_pendulum(x, vx, pendulum))
    }

    pub fn sample<R: Rng + ?Sized>(
        &self,
        kind: ModelKind,
        rng: &mut R,
    ) -> Result<InitialState, DatasetErrors> {
        Ok(match kind {
            ModelKind::Pendulum => InitialState::Pendulum(self.sample_pendulum(rng)?),
            ModelKind::PendulumCart => InitialState::PendulumOnCart(self.sample_cart(rng)?),
        })
    }
}

/// Random piecewise-constant cart force: a new level is drawn every `hold` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseControl {
    /// Distribution of each force level (N).
    pub force: Distribution,
    /// Duration each level is held (s).
    pub hold: f64,
}

impl Default for StaircaseControl {
    fn default() -> Self {
        Self {
            force: Distribution::Uniform {
                low: -10.0,
                high: 10.0,
            },
            hold: 1.0,
        }
    }
}

impl StaircaseControl {
    pub fn validate(&self) -> Result<(), DatasetErrors> {
        if !self.hold.is_finite() || self.hold <= 0.0 {
            return Err(DatasetErrors::InvalidConfig(format!(
                "control hold must be finite and greater than zero, got {}",
                self.hold
            )));
        }
        self.force.validate()
    }

    /// Steps per level, at least one.
    pub fn hold_steps(&self, dt: f64) -> usize {
        ((self.hold / dt).round() as usize).max(1)
    }

    /// Draws a force sequence of exactly `n_steps` entries.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        dt: f64,
        n_steps: usize,
        rng: &mut R,
    ) -> Result<ControlSequence, DatasetErrors> {
        let hold_steps = self.hold_steps(dt);
        let n_levels = n_steps.div_ceil(hold_steps);
        let levels = (0..n_levels)
            .map(|_| self.force.sample(rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ControlSequence::staircase(&levels, hold_steps, n_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_default_ranges() {
        let sampler = InitialConditionSampler::default();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let x = sampler.sample_cart(&mut rng).unwrap();
            assert!((0.0..=TAU + 1e-12).contains(&x.theta1));
            assert!((0.0..=TAU + 1e-12).contains(&x.theta2));
            assert!(x.omega1.abs() <= PI + 1e-12);
            assert!(x.omega2.abs() <= PI + 1e-12);
            assert_eq!(x.x, 0.0);
            assert_eq!(x.vx, 0.0);
        }
    }

    #[test]
    fn test_sample_matches_kind() {
        let sampler = InitialConditionSampler::default();
        let mut rng = SmallRng::seed_from_u64(3);
        for kind in ModelKind::ALL {
            assert_eq!(sampler.sample(kind, &mut rng).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_fixed_degrees_converted() {
        let sampler = InitialConditionSampler {
            theta1: Distribution::Fixed(90.0),
            omega1: Distribution::Fixed(0.0),
            theta2: Distribution::Fixed(-180.0),
            omega2: Distribution::Fixed(360.0),
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        let x = sampler.sample_pendulum(&mut rng).unwrap();
        assert_eq!(x, DoublePendulumState::from_degrees(90.0, 0.0, -180.0, 360.0));
    }

    #[test]
    fn test_staircase_levels_are_held() {
        let control = StaircaseControl::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let forces = control.sample(0.01, 500, &mut rng).unwrap();
        assert_eq!(forces.len(), 500);
        for chunk in forces.forces().chunks(100) {
            assert!(chunk.iter().all(|f| *f == chunk[0]));
            assert!(chunk[0].abs() <= 10.0);
        }
    }

    #[test]
    fn test_partial_last_level() {
        let control = StaircaseControl {
            force: Distribution::Fixed(2.0),
            hold: 0.3,
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(control.hold_steps(0.1), 3);
        let forces = control.sample(0.1, 7, &mut rng).unwrap();
        assert_eq!(forces.forces(), &[2.0; 7]);
    }

    #[test]
    fn test_invalid_hold() {
        let control = StaircaseControl {
            hold: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            control.validate(),
            Err(DatasetErrors::InvalidConfig(_))
        ));
    }
}
