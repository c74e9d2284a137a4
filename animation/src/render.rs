use std::path::Path;

use pendulum::ModelKind;
use plotters::{coord::Shift, prelude::*};
use tracing::info;

use crate::{
    AnimationErrors, plot_error,
    scene::{Frame, Scene},
    settings::AnimationSettings,
};

const CART_HALF_WIDTH: f64 = 0.2;
const CART_HALF_HEIGHT: f64 = 0.1;

/// Renders `scene` to an animated GIF at `path` and returns the number of frames written.
///
/// Frames are played back in real time: the delay between frames equals the simulated
/// time between them.
pub fn render_gif(
    scene: &Scene,
    path: &Path,
    settings: &AnimationSettings,
) -> Result<usize, AnimationErrors> {
    settings.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let stride = scene.frame_stride(settings.fps);
    let delay_ms = if scene.sample_interval() > 0.0 {
        ((stride as f64 * scene.sample_interval()) * 1000.0).round() as u32
    } else {
        (1000.0 / settings.fps).round() as u32
    };
    let indices = scene.frame_indices(settings.fps);

    let root = BitMapBackend::gif(path, (settings.width, settings.height), delay_ms.max(1))
        .map_err(plot_error)?
        .into_drawing_area();

    for &index in &indices {
        let frame = scene.frame(index, settings.trace);
        root.fill(&WHITE).map_err(plot_error)?;
        match (scene.forces(), scene.force_range()) {
            (Some(forces), Some(force_range)) => {
                let (upper, lower) = root.split_vertically(settings.height as i32 * 2 / 3);
                draw_links(&upper, scene, &frame)?;
                draw_control(&lower, scene.times(), forces, force_range, frame.t)?;
            }
            _ => draw_links(&root, scene, &frame)?,
        }
        root.present().map_err(plot_error)?;
    }

    info!(path = %path.display(), frames = indices.len(), delay_ms, "wrote animation");
    Ok(indices.len())
}

fn title(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Pendulum => "Double pendulum",
        ModelKind::PendulumCart => "Double pendulum on cart",
    }
}

fn draw_links<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    frame: &Frame,
) -> Result<(), AnimationErrors> {
    let (x_low, x_high) = scene.x_range();
    let (y_low, y_high) = scene.y_range();

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{}  t = {:.2} s", title(scene.kind()), frame.t),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_low..x_high, y_low..y_high)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("x (m)")
        .y_desc("y (m)")
        .draw()
        .map_err(plot_error)?;

    if scene.kind() == ModelKind::PendulumCart {
        let (px, py) = frame.links.pivot;
        chart
            .draw_series(LineSeries::new(
                [(x_low, 0.0), (x_high, 0.0)],
                BLACK.mix(0.3).stroke_width(1),
            ))
            .map_err(plot_error)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [
                    (px - CART_HALF_WIDTH, py + CART_HALF_HEIGHT),
                    (px + CART_HALF_WIDTH, py - CART_HALF_HEIGHT),
                ],
                BLACK.filled(),
            )))
            .map_err(plot_error)?;
    }

    chart
        .draw_series(LineSeries::new(
            frame.trace.iter().copied(),
            RED.mix(0.5).stroke_width(1),
        ))
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            frame.links.points(),
            BLACK.stroke_width(3),
        ))
        .map_err(plot_error)?;

    chart
        .draw_series(
            [frame.links.bob1, frame.links.bob2]
                .into_iter()
                .map(|p| Circle::new(p, 8, BLUE.filled())),
        )
        .map_err(plot_error)?;

    Ok(())
}

fn draw_control<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    times: &[f64],
    forces: &[f64],
    (f_low, f_high): (f64, f64),
    t: f64,
) -> Result<(), AnimationErrors> {
    let t_end = times.last().copied().unwrap_or(0.0).max(1e-3);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..t_end, f_low..f_high)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("t (s)")
        .y_desc("f (N)")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            times.iter().copied().zip(forces.iter().copied()),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_error)?;

    // cursor
    chart
        .draw_series(LineSeries::new(
            [(t, f_low), (t, f_high)],
            RED.stroke_width(1),
        ))
        .map_err(plot_error)?;

    Ok(())
}
