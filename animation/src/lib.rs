use pendulum::PendulumErrors;
use thiserror::Error;

pub mod render;
pub mod scene;
pub mod settings;

pub use render::render_gif;
pub use scene::{Frame, Scene};
pub use settings::AnimationSettings;

#[derive(Debug, Error)]
pub enum AnimationErrors {
    #[error("cannot animate an empty trajectory")]
    EmptyTrajectory,
    #[error("invalid animation settings: {0}")]
    InvalidSettings(String),
    #[error("{0}")]
    Pendulum(#[from] PendulumErrors),
    #[error("plotting error: {0}")]
    Plotting(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn plot_error<E: std::fmt::Display>(error: E) -> AnimationErrors {
    AnimationErrors::Plotting(error.to_string())
}
