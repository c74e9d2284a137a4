use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use csv::Writer;
use pendulum::{ModelKind, SimulationOutput};
use tracing::debug;

use crate::{DatasetErrors, batch::BatchResult};

pub const PENDULUM_HEADERS: [&str; 4] = ["th1 (rad)", "w1 (rad/s)", "th2 (rad)", "w2 (rad/s)"];
pub const CART_HEADERS: [&str; 7] = [
    "f (N)",
    "th1 (rad)",
    "w1 (rad/s)",
    "th2 (rad)",
    "w2 (rad/s)",
    "x (m)",
    "vx (m/s)",
];

/// Subdirectory of the dataset root holding the series of one model.
pub fn folder_name(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Pendulum => "double_pendulum",
        ModelKind::PendulumCart => "double_pendulum_on_cart",
    }
}

/// Writes trajectories as `<root>/<model folder>/series_<n>.csv`, one row per sample.
#[derive(Clone, Debug)]
pub struct DatasetWriter {
    root: PathBuf,
}

impl DatasetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn directory(&self, kind: ModelKind) -> PathBuf {
        self.root.join(folder_name(kind))
    }

    pub fn series_path(&self, kind: ModelKind, number: usize) -> PathBuf {
        self.directory(kind).join(format!("series_{number}.csv"))
    }

    /// Writes one trajectory as `series_<number>.csv`, creating directories as needed.
    pub fn write(&self, output: &SimulationOutput, number: usize) -> Result<PathBuf, DatasetErrors> {
        let kind = output.kind();
        std::fs::create_dir_all(self.directory(kind))?;
        let path = self.series_path(kind, number);
        let file = File::create(&path)?;
        write_csv(output, BufWriter::new(file))?;
        debug!(path = %path.display(), rows = output.len(), "wrote series");
        Ok(path)
    }

    /// Writes every completed run of a batch, numbered from 1 in batch order with no gaps
    /// for discarded runs.
    pub fn write_batch(&self, batch: &BatchResult) -> Result<Vec<PathBuf>, DatasetErrors> {
        batch
            .completed
            .iter()
            .enumerate()
            .map(|(i, run)| self.write(&run.output, i + 1))
            .collect()
    }
}

/// Writes the header row and one row per sample of `output` to `sink`.
pub fn write_csv<W: Write>(output: &SimulationOutput, sink: W) -> Result<(), DatasetErrors> {
    let mut writer = Writer::from_writer(sink);
    match output {
        SimulationOutput::Pendulum(trajectory) => {
            writer.write_record(PENDULUM_HEADERS)?;
            for x in trajectory.states() {
                writer.write_record(x.to_array().map(|v| v.to_string()))?;
            }
        }
        SimulationOutput::PendulumOnCart(trajectory) => {
            writer.write_record(CART_HEADERS)?;
            for (_, x, force) in trajectory.iter() {
                writer.write_record(
                    [
                        *force, x.theta1, x.omega1, x.theta2, x.omega2, x.x, x.vx,
                    ]
                    .map(|v| v.to_string()),
                )?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
