//! Integrate-then-render pipeline behind the `vdpsim` binary

use log::{debug, info};
use std::path::Path;

use crate::config::SimulationConfig;
use crate::driver;
use crate::error::Result;
use crate::export;
use crate::render::{Figure, ImageFormat};
use crate::trajectory::Trajectory;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub trajectories: Vec<Trajectory>,
    pub figure: Figure,
}

/// Integrate every configured mu, then build the figure
///
/// Nothing is written; see [`run`] for the persisting variant.
pub fn simulate(config: &SimulationConfig) -> Result<RunSummary> {
    config.validate()?;

    let grid = config.time_grid()?;
    let settings = config.integrator_settings();
    debug!(
        "mu parameters: {:?}, solver {}, {} grid points",
        config.mu_values,
        settings.method.as_str(),
        grid.len()
    );

    let trajectories = driver::sweep(&config.mu_values, config.initial_state(), &grid, &settings)?;
    let figure = Figure::sweep(config.render_mode, &grid, &trajectories);

    Ok(RunSummary {
        trajectories,
        figure,
    })
}

/// Full run: simulate, save the figure to `output` and optionally the CSV
///
/// The output format is checked before any integration starts.
pub fn run(config: &SimulationConfig, output: &Path, csv: Option<&Path>) -> Result<RunSummary> {
    ImageFormat::from_path(output)?;

    let summary = simulate(config)?;

    summary.figure.save(output)?;
    info!("Output to: {}", output.display());

    if let Some(csv_path) = csv {
        let grid = config.time_grid()?;
        export::save_csv(csv_path, &grid, &summary.trajectories)?;
        info!("Trajectories written to: {}", csv_path.display());
    }

    Ok(summary)
}
