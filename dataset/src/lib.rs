use diffeq::DiffEqErrors;
use pendulum::PendulumErrors;
use thiserror::Error;

pub mod batch;
pub mod config;
pub mod distribution;
pub mod sampler;
pub mod writer;

pub use batch::{BatchResult, BatchRunner, CompletedRun, DiscardedRun};
pub use config::SimulationConfig;
pub use distribution::Distribution;
pub use sampler::{InitialConditionSampler, StaircaseControl};
pub use writer::DatasetWriter;

#[derive(Debug, Error)]
pub enum DatasetErrors {
    #[error("{0}")]
    Pendulum(#[from] PendulumErrors),
    #[error("{0}")]
    DiffEq(#[from] DiffEqErrors),
    #[error("invalid distribution: {0}")]
    Distribution(String),
    #[error("{0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not parse configuration: {0}")]
    RonParse(#[from] ron::error::SpannedError),
    #[error("could not serialize configuration: {0}")]
    RonWrite(#[from] ron::Error),
}
