//! Run configuration
//!
//! Defaults reproduce the classroom run: start at `(0, 1)`, integrate over
//! one period `2π` with step `0.01` and sweep `mu = 0, 1, 2`. A JSON file
//! may override any subset of fields; command-line flags override both.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::driver::{IntegratorSettings, Method};
use crate::error::{Result, SimError};
use crate::grid::TimeGrid;
use crate::model::{PhaseState, DEFAULT_MU_SWEEP};
use crate::render::RenderMode;

/// Everything one Van der Pol run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Initial position x0
    pub initial_position: f64,

    /// Initial momentum p0
    pub initial_momentum: f64,

    /// Length of the integration window starting at t = 0
    pub integration_time: f64,

    /// Grid spacing
    pub delta_time: f64,

    /// Damping values, plotted in this order
    pub mu_values: Vec<f64>,

    /// ODE solver
    pub solver: Method,

    /// Panel layout of the figure
    pub render_mode: RenderMode,

    /// Absolute tolerance for adaptive stepping
    pub atol: f64,

    /// Relative tolerance for adaptive stepping
    pub rtol: f64,

    /// Minimum adaptive step
    pub min_step: f64,

    /// Maximum internal step (RK4 sub-steps each grid interval to honor it)
    pub max_step: Option<f64>,

    /// Step budget per integration
    pub max_steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let settings = IntegratorSettings::default();
        Self {
            initial_position: 0.0,
            initial_momentum: 1.0,
            integration_time: 2.0 * std::f64::consts::PI,
            delta_time: 0.01,
            mu_values: DEFAULT_MU_SWEEP.to_vec(),
            solver: Method::Rk4,
            render_mode: RenderMode::MultiPanel,
            atol: settings.atol,
            rtol: settings.rtol,
            min_step: settings.min_step,
            max_step: settings.max_step,
            max_steps: settings.max_steps,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SimError::invalid(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| SimError::invalid(format!("config '{}': {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SimError::invalid(format!("malformed config: {e}")))
    }

    /// Check the domain of every field
    pub fn validate(&self) -> Result<()> {
        if !self.initial_position.is_finite() || !self.initial_momentum.is_finite() {
            return Err(SimError::invalid(format!(
                "initial conditions must be finite, got x0 = {}, p0 = {}",
                self.initial_position, self.initial_momentum
            )));
        }
        if !(self.integration_time.is_finite() && self.integration_time > 0.0) {
            return Err(SimError::invalid(format!(
                "integration time must be positive, got {}",
                self.integration_time
            )));
        }
        if !(self.delta_time.is_finite() && self.delta_time > 0.0) {
            return Err(SimError::invalid(format!(
                "step size must be positive, got {}",
                self.delta_time
            )));
        }
        if let Some(mu) = self.mu_values.iter().find(|mu| !mu.is_finite()) {
            return Err(SimError::invalid(format!("mu values must be finite, got {mu}")));
        }
        self.integrator_settings().validate()
    }

    pub fn initial_state(&self) -> PhaseState {
        PhaseState::new(self.initial_position, self.initial_momentum)
    }

    /// `arange(0, integration_time, delta_time)`
    pub fn time_grid(&self) -> Result<TimeGrid> {
        TimeGrid::arange(0.0, self.integration_time, self.delta_time)
    }

    pub fn integrator_settings(&self) -> IntegratorSettings {
        IntegratorSettings {
            method: self.solver,
            atol: self.atol,
            rtol: self.rtol,
            min_step: self.min_step,
            max_step: self.max_step,
            initial_step: None,
            max_steps: self.max_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_classroom_run() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial_state(), PhaseState::new(0.0, 1.0));
        assert_eq!(config.mu_values, vec![0.0, 1.0, 2.0]);
        assert_eq!(config.time_grid().unwrap().len(), 629);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "initial_position": 2.0, "solver": "dopri54", "mu_values": [5.0] }"#,
        )
        .unwrap();

        assert_eq!(config.initial_position, 2.0);
        assert_eq!(config.initial_momentum, 1.0);
        assert_eq!(config.solver, Method::Dopri54);
        assert_eq!(config.mu_values, vec![5.0]);
        assert_eq!(config.render_mode, RenderMode::MultiPanel);
    }

    #[test]
    fn test_unknown_field_is_invalid_argument() {
        let err = SimulationConfig::from_json_str(r#"{ "step": 0.1 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "render_mode": "single", "delta_time": 0.5 }}"#).unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.render_mode, RenderMode::SinglePanel);
        assert_eq!(config.delta_time, 0.5);

        assert!(SimulationConfig::from_json_file("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let cases = [
            SimulationConfig {
                delta_time: 0.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                integration_time: -1.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                initial_momentum: f64::NAN,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                mu_values: vec![1.0, f64::INFINITY],
                ..SimulationConfig::default()
            },
            SimulationConfig {
                rtol: -1.0,
                ..SimulationConfig::default()
            },
        ];

        for config in &cases {
            assert!(
                matches!(config.validate(), Err(SimError::InvalidArgument(_))),
                "{config:?}"
            );
        }
    }
}
