//! vdpsim - Van der Pol oscillator sweeps and small probability experiments
//!
//! Integrates the Van der Pol oscillator
//!
//! ```text
//! x'' - mu (1 - x²) x' + x = 0
//! ```
//!
//! for a set of damping values and plots position, momentum and the phase
//! portrait of every run. Two companion programs plot `sin(x)/x` and estimate
//! conditional probabilities of a binary diagnostic test by Monte Carlo.
//!
//! # Architecture
//!
//! - [`model`]: the right-hand side, on a named [`PhaseState`]
//! - [`solvers`]: staged explicit Runge-Kutta solvers (RK4, RKDP54)
//! - [`driver`]: integrates a model over a [`TimeGrid`], one [`Trajectory`] per mu
//! - [`render`]: builds a [`Figure`] from trajectories and draws it with plotters
//! - [`pipeline`]: the integrate-then-render run behind the `vdpsim` binary
//!
//! # Example
//!
//! ```rust,no_run
//! use vdpsim::prelude::*;
//!
//! let grid = TimeGrid::linspace(0.0, 2.0 * std::f64::consts::PI, 500)?;
//! let trajectories = sweep(
//!     &DEFAULT_MU_SWEEP,
//!     PhaseState::new(0.0, 1.0),
//!     &grid,
//!     &IntegratorSettings::default(),
//! )?;
//!
//! Figure::sweep(RenderMode::MultiPanel, &grid, &trajectories).save("result.png")?;
//! # Ok::<(), vdpsim::SimError>(())
//! ```

pub mod config;
pub mod curve;
pub mod diagnostic;
pub mod driver;
pub mod error;
pub mod export;
pub mod grid;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod solvers;
pub mod trajectory;

pub use config::SimulationConfig;
pub use driver::{integrate, sweep, IntegratorSettings, Method};
pub use error::{Result, SimError};
pub use grid::TimeGrid;
pub use model::{PhaseState, VanDerPol, DEFAULT_MU_SWEEP};
pub use render::{Figure, RenderMode};
pub use trajectory::Trajectory;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::diagnostic::{DiagnosticTest, MonteCarloEstimate};
    pub use crate::driver::{integrate, sweep, IntegratorSettings, Method};
    pub use crate::error::{Result, SimError};
    pub use crate::grid::TimeGrid;
    pub use crate::model::{PhaseState, VanDerPol, DEFAULT_MU_SWEEP};
    pub use crate::render::{Figure, RenderMode};
    pub use crate::trajectory::Trajectory;
}
