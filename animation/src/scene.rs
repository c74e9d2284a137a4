use pendulum::{
    Model, ModelKind, PendulumErrors, SimulationOutput,
    kinematics::{LinkPositions, Point},
};

use crate::AnimationErrors;

/// Everything drawn in one animation frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub t: f64,
    pub links: LinkPositions,
    /// Recent positions of the second bob, oldest first, ending at the current one.
    pub trace: Vec<Point>,
    /// Cart force applied at this sample (N).
    pub force: Option<f64>,
}

/// Link geometry of a whole trajectory, precomputed for rendering.
#[derive(Clone, Debug)]
pub struct Scene {
    kind: ModelKind,
    times: Vec<f64>,
    links: Vec<LinkPositions>,
    forces: Option<Vec<f64>>,
    reach: f64,
}

impl Scene {
    /// Builds the scene of `output`, which must have been produced by `model`.
    pub fn new(model: &Model, output: &SimulationOutput) -> Result<Self, AnimationErrors> {
        let (times, links, forces, reach) = match (model, output) {
            (Model::Pendulum(model), SimulationOutput::Pendulum(trajectory)) => (
                trajectory.times().to_vec(),
                trajectory
                    .states()
                    .iter()
                    .map(|x| model.link_positions(x))
                    .collect(),
                None,
                model.parameters().l1 + model.parameters().l2,
            ),
            (Model::PendulumOnCart(model), SimulationOutput::PendulumOnCart(trajectory)) => (
                trajectory.times().to_vec(),
                trajectory
                    .states()
                    .iter()
                    .map(|x| model.link_positions(x))
                    .collect(),
                Some(trajectory.inputs().to_vec()),
                model.parameters().l1 + model.parameters().l2,
            ),
            (model, output) => {
                return Err(PendulumErrors::ModelMismatch {
                    model: model.kind(),
                    state: output.kind(),
                }
                .into());
            }
        };
        if times.is_empty() {
            return Err(AnimationErrors::EmptyTrajectory);
        }
        Ok(Self {
            kind: model.kind(),
            times,
            links,
            forces,
            reach,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn forces(&self) -> Option<&[f64]> {
        self.forces.as_deref()
    }

    /// Spacing of the recorded samples (s), zero for a single sample.
    pub fn sample_interval(&self) -> f64 {
        match self.times.as_slice() {
            [t0, t1, ..] => t1 - t0,
            _ => 0.0,
        }
    }

    /// Number of recorded samples between consecutive frames at `fps`.
    pub fn frame_stride(&self, fps: f64) -> usize {
        let dt = self.sample_interval();
        if dt <= 0.0 {
            return 1;
        }
        ((1.0 / fps) / dt).round().max(1.0) as usize
    }

    /// Sample indices shown as frames at `fps`, always starting with the first sample.
    pub fn frame_indices(&self, fps: f64) -> Vec<usize> {
        (0..self.len()).step_by(self.frame_stride(fps)).collect()
    }

    /// The frame at sample `index`, with a trace covering the preceding `trace` seconds.
    pub fn frame(&self, index: usize, trace: f64) -> Frame {
        let index = index.min(self.len() - 1);
        let dt = self.sample_interval();
        let trace_samples = if dt > 0.0 {
            (trace / dt).round() as usize
        } else {
            0
        };
        let start = index.saturating_sub(trace_samples);
        Frame {
            t: self.times[index],
            links: self.links[index],
            trace: self.links[start..=index].iter().map(|l| l.bob2).collect(),
            force: self.forces.as_ref().map(|f| f[index]),
        }
    }

    /// Horizontal plot extent: the pivot travel widened by the full reach of the links.
    pub fn x_range(&self) -> (f64, f64) {
        let (low, high) = self
            .links
            .iter()
            .map(|l| l.pivot.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let margin = 1.1 * self.reach;
        (low - margin, high + margin)
    }

    pub fn y_range(&self) -> (f64, f64) {
        let margin = 1.1 * self.reach;
        (-margin, margin)
    }

    /// Symmetric extent of the control plot, at least one newton either side.
    pub fn force_range(&self) -> Option<(f64, f64)> {
        self.forces.as_ref().map(|forces| {
            let peak = forces.iter().fold(1.0_f64, |acc, f| acc.max(f.abs()));
            (-1.1 * peak, 1.1 * peak)
        })
    }
}
