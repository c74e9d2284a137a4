use std::error::Error;

use animation::{AnimationSettings, Scene, render_gif};
use colored::Colorize;
use dataset::{BatchResult, BatchRunner, DatasetWriter, SimulationConfig, writer::folder_name};
use pendulum::ModelKind;
use tracing::info;

pub struct Options {
    pub kind: ModelKind,
    pub n_simulations: usize,
    pub progress: bool,
    pub fps: Option<f64>,
}

fn run_batch(
    config: &SimulationConfig,
    options: &Options,
) -> Result<(BatchRunner, BatchResult), Box<dyn Error>> {
    let runner = BatchRunner::from_config(config, options.kind)?.with_progress(options.progress);
    let batch = runner.run(options.n_simulations)?;
    Ok((runner, batch))
}

pub fn dataset(config: &SimulationConfig, options: &Options) -> Result<(), Box<dyn Error>> {
    let (runner, batch) = run_batch(config, options)?;
    let writer = DatasetWriter::new(&config.output);
    let paths = writer.write_batch(&batch)?;
    success(&format!(
        "wrote {} series to {}",
        paths.len(),
        writer.directory(options.kind).display()
    ));
    summarize(&runner, &batch);
    Ok(())
}

pub fn animation(config: &SimulationConfig, options: &Options) -> Result<(), Box<dyn Error>> {
    let (runner, batch) = run_batch(config, options)?;
    let mut settings = AnimationSettings::default();
    if let Some(fps) = options.fps {
        settings.fps = fps;
    }

    let directory = config
        .output
        .join("animations")
        .join(folder_name(options.kind));
    for (i, run) in batch.completed.iter().enumerate() {
        let scene = Scene::new(runner.model(), &run.output)?;
        let path = directory.join(format!("animation_{}.gif", i + 1));
        let frames = render_gif(&scene, &path, &settings)?;
        info!(index = run.index, frames, "rendered run");
        success(&format!("wrote {}", path.display()));
    }
    summarize(&runner, &batch);
    Ok(())
}

fn summarize(runner: &BatchRunner, batch: &BatchResult) {
    println!(
        "{} {} of {} runs completed ({} steps each, seed {})",
        "done:".bold(),
        batch.completed.len(),
        batch.len(),
        runner.n_steps(),
        runner.seed()
    );
    for run in &batch.discarded {
        warning(&format!("run {} discarded: {}", run.index + 1, run.error));
    }
}

fn success(s: &str) {
    println!("{}", s.green())
}

fn warning(s: &str) {
    eprintln!("{}", s.yellow())
}
