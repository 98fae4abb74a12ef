//! Error taxonomy shared by the library and the command-line programs

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller of a simulation or rendering run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Non-finite or out-of-domain input (initial conditions, step size,
    /// integration time, probabilities, configuration, output format)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The solver could not produce a finite trajectory
    #[error("integration failed for mu = {mu} at t = {time}: {reason}")]
    IntegrationFailure { mu: f64, time: f64, reason: String },

    /// The rendered or exported artifact could not be persisted
    #[error("failed to write '{}': {reason}", .path.display())]
    OutputWriteFailure { path: PathBuf, reason: String },
}

impl SimError {
    /// Process exit status for this error
    ///
    /// Zero is success; each error kind gets its own non-zero status.
    pub fn exit_code(&self) -> u8 {
        match self {
            SimError::InvalidArgument(_) => 2,
            SimError::IntegrationFailure { .. } => 3,
            SimError::OutputWriteFailure { .. } => 4,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidArgument(msg.into())
    }

    pub(crate) fn write_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SimError::OutputWriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SimError>;
