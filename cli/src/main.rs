use std::{error::Error, path::PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use dataset::{DatasetErrors, SimulationConfig};
use diffeq::RungeKuttaMethods;
use pendulum::ModelKind;
use tracing::Level;

mod commands;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Write one CSV per simulation
    Dataset,
    /// Write one animated GIF per simulation
    Animation,
}

/// Generate datasets and animations of the double pendulum and the double pendulum on cart.
#[derive(Debug, Parser)]
#[command(name = "double_pendulum_nn", version, about)]
struct Cli {
    /// Model of the system: pendulum or pendulum_cart
    model: ModelKind,
    /// Mode of the program
    #[arg(value_enum)]
    mode: Mode,
    /// Number of simulations to run
    n_simulations: usize,
    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Integration step (s)
    #[arg(long)]
    dt: Option<f64>,
    /// Duration of each simulation (s)
    #[arg(long)]
    t_stop: Option<f64>,
    /// Seed of the random initial conditions and forces
    #[arg(long)]
    seed: Option<u64>,
    /// Integration method: euler, midpoint, heun, ralston or rk4
    #[arg(short, long)]
    method: Option<RungeKuttaMethods>,
    /// Animation frame rate
    #[arg(long)]
    fps: Option<f64>,
    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// The configuration file (or defaults) with command line overrides applied.
    fn config(&self) -> Result<SimulationConfig, DatasetErrors> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(t_stop) = self.t_stop {
            config.t_stop = t_stop;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config()?;
    let options = commands::Options {
        kind: cli.model,
        n_simulations: cli.n_simulations,
        progress: !cli.no_progress,
        fps: cli.fps,
    };
    match cli.mode {
        Mode::Dataset => commands::dataset(&config, &options),
        Mode::Animation => commands::animation(&config, &options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_arguments() {
        let cli = Cli::try_parse_from(["double_pendulum_nn", "pendulum_cart", "dataset", "10"])
            .unwrap();
        assert_eq!(cli.model, ModelKind::PendulumCart);
        assert_eq!(cli.mode, Mode::Dataset);
        assert_eq!(cli.n_simulations, 10);
        assert_eq!(cli.log_level(), Level::WARN);
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::try_parse_from([
            "double_pendulum_nn",
            "pendulum",
            "animation",
            "1",
            "--dt",
            "0.02",
            "--t-stop",
            "3",
            "--seed",
            "4",
            "--method",
            "euler",
            "-vv",
        ])
        .unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.dt, 0.02);
        assert_eq!(config.t_stop, 3.0);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.method, RungeKuttaMethods::Euler);
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_rejects_unknown_model() {
        assert!(Cli::try_parse_from(["double_pendulum_nn", "triple", "dataset", "1"]).is_err());
        assert!(Cli::try_parse_from(["double_pendulum_nn", "pendulum", "plot", "1"]).is_err());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli =
            Cli::try_parse_from(["double_pendulum_nn", "pendulum", "dataset", "1", "--dt=-1"])
                .unwrap();
        assert!(cli.config().is_err());
    }
}
