use diffeq::FixedStepSolver;
use indicatif::{ProgressBar, ProgressStyle};
use pendulum::{ControlSequence, InitialState, Model, ModelKind, PendulumErrors, SimulationOutput};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    DatasetErrors,
    config::SimulationConfig,
    sampler::{InitialConditionSampler, StaircaseControl},
};

/// A run that finished; `index` is its position in the batch.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedRun {
    pub index: usize,
    pub initial_state: InitialState,
    pub output: SimulationOutput,
}

/// A run that was dropped because integration failed.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscardedRun {
    pub index: usize,
    pub initial_state: InitialState,
    pub error: PendulumErrors,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResult {
    /// Completed runs in batch order.
    pub completed: Vec<CompletedRun>,
    pub discarded: Vec<DiscardedRun>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.completed.len() + self.discarded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct RunInput {
    index: usize,
    initial_state: InitialState,
    control: Option<ControlSequence>,
}

/// Runs many independent simulations of one model.
///
/// All random draws happen up front on a single seeded generator, so a batch is
/// reproducible from its seed no matter how the runs are scheduled across threads.
#[derive(Clone, Debug)]
pub struct BatchRunner {
    model: Model,
    solver: FixedStepSolver,
    n_steps: usize,
    sampler: InitialConditionSampler,
    control: StaircaseControl,
    seed: u64,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(model: Model, solver: FixedStepSolver, n_steps: usize) -> Self {
        Self {
            model,
            solver,
            n_steps,
            sampler: InitialConditionSampler::default(),
            control: StaircaseControl::default(),
            seed: rand::rng().random(),
            show_progress: false,
        }
    }

    pub fn from_config(config: &SimulationConfig, kind: ModelKind) -> Result<Self, DatasetErrors> {
        config.validate()?;
        let mut runner = Self::new(config.model(kind)?, config.solver()?, config.n_steps()?)
            .with_sampler(config.initial_conditions.clone())
            .with_control(config.control.clone());
        if let Some(seed) = config.seed {
            runner = runner.with_seed(seed);
        }
        Ok(runner)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sampler(mut self, sampler: InitialConditionSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_control(mut self, control: StaircaseControl) -> Self {
        self.control = control;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Samples one initial state (and, for the cart, one force sequence) per run.
    fn sample_inputs(&self, n_runs: usize) -> Result<Vec<RunInput>, DatasetErrors> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let kind = self.model.kind();
        let mut inputs = Vec::with_capacity(n_runs);
        for index in 0..n_runs {
            let initial_state = self.sampler.sample(kind, &mut rng)?;
            let control = match kind {
                ModelKind::Pendulum => None,
                ModelKind::PendulumCart => {
                    Some(self.control.sample(self.solver.dt(), self.n_steps, &mut rng)?)
                }
            };
            inputs.push(RunInput {
                index,
                initial_state,
                control,
            });
        }
        Ok(inputs)
    }

    fn progress_bar(&self, n_runs: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(n_runs as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{elapsed_precise}] {bar:40} {pos}/{len} ({eta})")
        {
            bar.set_style(style);
        }
        bar.set_message(format!("simulating {}", self.model.kind()));
        bar
    }

    /// Runs `n_runs` simulations in parallel. Failed runs are logged and discarded;
    /// only sampling errors abort the batch.
    pub fn run(&self, n_runs: usize) -> Result<BatchResult, DatasetErrors> {
        let inputs = self.sample_inputs(n_runs)?;
        let progress = self.progress_bar(n_runs);
        info!(
            model = %self.model.kind(),
            n_runs,
            n_steps = self.n_steps,
            dt = self.solver.dt(),
            method = %self.solver.method(),
            seed = self.seed,
            "starting batch"
        );

        let outcomes: Vec<_> = inputs
            .into_par_iter()
            .map(|mut input| {
                let result = self.model.simulate(
                    &input.initial_state,
                    &self.solver,
                    self.n_steps,
                    input.control.as_mut(),
                );
                progress.inc(1);
                (input.index, input.initial_state, result)
            })
            .collect();
        progress.finish_and_clear();

        let mut batch = BatchResult::default();
        for (index, initial_state, result) in outcomes {
            match result {
                Ok(output) => {
                    debug!(index, samples = output.len(), "run completed");
                    batch.completed.push(CompletedRun {
                        index,
                        initial_state,
                        output,
                    });
                }
                Err(error) => {
                    warn!(index, %error, "discarding run");
                    batch.discarded.push(DiscardedRun {
                        index,
                        initial_state,
                        error,
                    });
                }
            }
        }
        info!(
            completed = batch.completed.len(),
            discarded = batch.discarded.len(),
            "batch finished"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Distribution;
    use diffeq::{FixedStepControl, RungeKuttaMethods};
    use pendulum::{
        CartPendulumParameters, DoublePendulum, DoublePendulumOnCart, DoublePendulumParameters,
    };

    fn solver() -> FixedStepSolver {
        FixedStepSolver::new(RungeKuttaMethods::Rk4, FixedStepControl::new(0.01).unwrap())
    }

    fn pendulum_runner() -> BatchRunner {
        let model = Model::from(DoublePendulum::new(DoublePendulumParameters::default()).unwrap());
        BatchRunner::new(model, solver(), 100)
    }

    #[test]
    fn test_same_seed_same_batch() {
        let a = pendulum_runner().with_seed(5).run(6).unwrap();
        let b = pendulum_runner().with_seed(5).run(6).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.completed.len(), 6);
        for (i, run) in a.completed.iter().enumerate() {
            assert_eq!(run.index, i);
            assert_eq!(run.output.len(), 100);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = pendulum_runner().with_seed(1).run(2).unwrap();
        let b = pendulum_runner().with_seed(2).run(2).unwrap();
        assert_ne!(a.completed[0].initial_state, b.completed[0].initial_state);
    }

    #[test]
    fn test_cart_runs_record_staircase() {
        let model = Model::from(DoublePendulumOnCart::new(CartPendulumParameters::default()).unwrap());
        let batch = BatchRunner::new(model, solver(), 250).with_seed(9).run(3).unwrap();
        assert_eq!(batch.completed.len(), 3);
        for run in &batch.completed {
            let SimulationOutput::PendulumOnCart(trajectory) = &run.output else {
                panic!("expected a cart trajectory");
            };
            let forces = trajectory.inputs();
            assert_eq!(forces.len(), 250);
            assert!(forces[..100].iter().all(|f| *f == forces[0]));
            assert!(forces[100..200].iter().all(|f| *f == forces[100]));
        }
    }

    /// Singular runs are set aside without stopping the rest of the batch.
    #[test]
    fn test_failed_runs_are_discarded() {
        let parameters = DoublePendulumParameters::default().with_masses(1e-12, 1.0);
        let model = Model::from(DoublePendulum::new(parameters).unwrap());
        let aligned = InitialConditionSampler {
            theta1: Distribution::Fixed(15.0),
            omega1: Distribution::Fixed(0.0),
            theta2: Distribution::Fixed(15.0),
            omega2: Distribution::Fixed(0.0),
            ..Default::default()
        };
        let batch = BatchRunner::new(model, solver(), 50)
            .with_sampler(aligned)
            .with_seed(0)
            .run(4)
            .unwrap();
        assert!(batch.completed.is_empty());
        assert_eq!(batch.discarded.len(), 4);
        assert_eq!(batch.len(), 4);
        for (i, run) in batch.discarded.iter().enumerate() {
            assert_eq!(run.index, i);
            assert!(matches!(
                run.error,
                PendulumErrors::SingularConfiguration { .. }
            ));
        }
    }

    #[test]
    fn test_invalid_sampler_aborts() {
        let sampler = InitialConditionSampler {
            omega2: Distribution::Uniform {
                low: 1.0,
                high: -1.0,
            },
            ..Default::default()
        };
        let result = pendulum_runner().with_sampler(sampler).run(2);
        assert!(matches!(result, Err(DatasetErrors::Distribution(_))));
    }
}
