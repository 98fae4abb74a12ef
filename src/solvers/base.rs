//! Base solver traits and types

use nalgebra::DVector;
use thiserror::Error;

/// Solver-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Timestep {dt} smaller than minimum {dt_min}")]
    TimestepTooSmall { dt: f64, dt_min: f64 },

    #[error("Exceeded maximum of {0} steps")]
    MaxStepsExceeded(usize),

    #[error("Non-finite state encountered")]
    NonFiniteState,

    #[error("History buffer is empty")]
    EmptyHistory,
}

/// Result of a solver step
#[derive(Debug, Clone, Copy)]
pub struct SolverStepResult {
    pub success: bool,
    pub error_norm: f64,
    pub scale: Option<f64>,
}

impl Default for SolverStepResult {
    fn default() -> Self {
        Self {
            success: true,
            error_norm: 0.0,
            scale: None,
        }
    }
}

/// Core solver trait for numerical integration
pub trait Solver {
    /// Get current state vector
    fn state(&self) -> &DVector<f64>;

    /// Set state vector
    fn set_state(&mut self, state: DVector<f64>);

    /// Buffer current state for potential reversion
    fn buffer(&mut self, dt: f64);

    /// Revert to buffered state
    fn revert(&mut self) -> Result<(), SolverError>;

    /// Reset solver to initial state
    fn reset(&mut self);

    /// Order of the method
    fn order(&self) -> usize;

    /// Number of stages
    fn stages(&self) -> usize;

    /// Is this an adaptive solver?
    fn is_adaptive(&self) -> bool;
}

/// Explicit solver trait
///
/// A full timestep is `buffer(dt)` followed by `stages()` calls to `step`.
/// The right-hand side receives the stage state and the stage offset
/// `c_i * dt` from the start of the step.
pub trait ExplicitSolver: Solver {
    /// Perform one stage with the given right-hand side function
    fn step<F>(&mut self, f: F, dt: f64) -> Result<SolverStepResult, SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>;

    /// Run every stage of one timestep, returning the result of the last stage
    fn full_step<F>(&mut self, mut f: F, dt: f64) -> Result<SolverStepResult, SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        self.buffer(dt);
        let mut result = SolverStepResult::default();
        for _ in 0..self.stages() {
            result = self.step(&mut f, dt)?;
        }
        Ok(result)
    }
}
