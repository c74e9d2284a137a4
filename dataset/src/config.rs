use std::path::{Path, PathBuf};

use diffeq::{FixedStepControl, FixedStepSolver, RungeKuttaMethods, stepping::DEFAULT_DT};
use pendulum::{
    CartPendulumParameters, DoublePendulum, DoublePendulumOnCart, DoublePendulumParameters,
    Model, ModelKind,
};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::{
    DatasetErrors,
    sampler::{InitialConditionSampler, StaircaseControl},
};

/// Everything needed to reproduce a batch of runs. Missing fields take their defaults,
/// so a RON file only has to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pendulum: DoublePendulumParameters,
    pub cart: CartPendulumParameters,
    /// Integration step (s).
    pub dt: f64,
    /// Duration of each run (s).
    pub t_stop: f64,
    pub method: RungeKuttaMethods,
    pub initial_conditions: InitialConditionSampler,
    pub control: StaircaseControl,
    /// Root directory of the generated files.
    pub output: PathBuf,
    /// Seed of the batch generator, drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pendulum: DoublePendulumParameters::default(),
            cart: CartPendulumParameters::default(),
            dt: DEFAULT_DT,
            t_stop: 5.0,
            method: RungeKuttaMethods::default(),
            initial_conditions: InitialConditionSampler::default(),
            control: StaircaseControl::default(),
            output: PathBuf::from("dataset"),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron(s: &str) -> Result<Self, DatasetErrors> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, DatasetErrors> {
        Ok(ron::ser::to_string_pretty(self, PrettyConfig::default())?)
    }

    pub fn load(path: &Path) -> Result<Self, DatasetErrors> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    pub fn save(&self, path: &Path) -> Result<(), DatasetErrors> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DatasetErrors> {
        self.pendulum.validate()?;
        self.cart.validate()?;
        FixedStepControl::new(self.dt)?;
        if !self.t_stop.is_finite() || self.t_stop <= 0.0 {
            return Err(DatasetErrors::InvalidConfig(format!(
                "t_stop must be finite and greater than zero, got {}",
                self.t_stop
            )));
        }
        self.initial_conditions.validate()?;
        self.control.validate()
    }

    pub fn solver(&self) -> Result<FixedStepSolver, DatasetErrors> {
        Ok(FixedStepSolver::new(
            self.method,
            FixedStepControl::new(self.dt)?,
        ))
    }

    /// Samples per run: `t_stop / dt` rounded up.
    pub fn n_steps(&self) -> Result<usize, DatasetErrors> {
        Ok(FixedStepControl::new(self.dt)?.steps_for(self.t_stop))
    }

    pub fn model(&self, kind: ModelKind) -> Result<Model, DatasetErrors> {
        Ok(match kind {
            ModelKind::Pendulum => Model::from(DoublePendulum::new(self.pendulum.clone())?),
            ModelKind::PendulumCart => Model::from(DoublePendulumOnCart::new(self.cart.clone())?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Distribution;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.n_steps().unwrap(), 500);
        assert_eq!(config.method, RungeKuttaMethods::Rk4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = SimulationConfig::from_ron("(dt: 0.005, t_stop: 2.0)").unwrap();
        assert_eq!(config.dt, 0.005);
        assert_eq!(config.n_steps().unwrap(), 400);
        assert_eq!(config.pendulum, DoublePendulumParameters::default());
        assert_eq!(config.control, StaircaseControl::default());
    }

    #[test]
    fn test_nested_overrides() {
        let text = r#"(
            method: euler,
            seed: Some(7),
            cart: (cart_mass: 2.5, cart_damping: 0.1),
            initial_conditions: (theta1: Fixed(170.0), x: Uniform(low: -1.0, high: 1.0)),
        )"#;
        let config = SimulationConfig::from_ron(text).unwrap();
        assert_eq!(config.method, RungeKuttaMethods::Euler);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cart.cart_mass, 2.5);
        assert_eq!(config.cart.m1, 1.0);
        assert_eq!(config.initial_conditions.theta1, Distribution::Fixed(170.0));
        assert_eq!(
            config.initial_conditions.omega1,
            InitialConditionSampler::default().omega1
        );
    }

    #[test]
    fn test_round_trip() {
        let mut config = SimulationConfig::default();
        config.seed = Some(99);
        config.t_stop = 3.0;
        let text = config.to_ron().unwrap();
        assert_eq!(SimulationConfig::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SimulationConfig::from_ron("(dt: 0.0)"),
            Err(DatasetErrors::DiffEq(_))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(t_stop: -1.0)"),
            Err(DatasetErrors::InvalidConfig(_))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(pendulum: (l2: 0.0))"),
            Err(DatasetErrors::Pendulum(_))
        ));
        assert!(matches!(
            SimulationConfig::from_ron("(dt: \"fast\")"),
            Err(DatasetErrors::RonParse(_))
        ));
    }

    #[test]
    fn test_model_kind() {
        let config = SimulationConfig::default();
        for kind in ModelKind::ALL {
            assert_eq!(config.model(kind).unwrap().kind(), kind);
        }
    }
}
