//! Integrator driver
//!
//! Turns an initial state, a time grid and a damping value into a
//! [`Trajectory`] sampled exactly at the grid points. Step-size control is
//! internal; only the requested output times are observable.

use log::debug;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::grid::TimeGrid;
use crate::model::{PhaseState, VanDerPol};
use crate::solvers::{ExplicitSolver, Solver, SolverError, RK4, RKDP54};
use crate::trajectory::Trajectory;

/// Available ODE solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Classical RK4 (4th order, fixed step)
    #[default]
    Rk4,
    /// Dormand-Prince 5(4) with adaptive step
    Dopri54,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Rk4 => "RK4",
            Method::Dopri54 => "DOPRI54",
        }
    }
}

/// Solver selection and step control
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorSettings {
    pub method: Method,
    /// Absolute tolerance for adaptive stepping
    pub atol: f64,
    /// Relative tolerance for adaptive stepping
    pub rtol: f64,
    /// Smallest step the adaptive controller may take
    pub min_step: f64,
    /// Largest internal step; `None` means one RK4 step per grid interval
    /// and an unbounded adaptive step
    pub max_step: Option<f64>,
    /// First adaptive step; defaults to the first grid interval
    pub initial_step: Option<f64>,
    /// Accepted plus rejected steps allowed for one integration
    pub max_steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            method: Method::Rk4,
            atol: 1e-8,
            rtol: 1e-6,
            min_step: 1e-12,
            max_step: None,
            initial_step: None,
            max_steps: 1_000_000,
        }
    }
}

impl IntegratorSettings {
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.atol.is_finite() && self.atol > 0.0) {
            return Err(SimError::invalid(format!("atol must be positive, got {}", self.atol)));
        }
        if !(self.rtol.is_finite() && self.rtol >= 0.0) {
            return Err(SimError::invalid(format!(
                "rtol must be non-negative, got {}",
                self.rtol
            )));
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return Err(SimError::invalid(format!(
                "min_step must be positive, got {}",
                self.min_step
            )));
        }
        for (name, value) in [("max_step", self.max_step), ("initial_step", self.initial_step)] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(SimError::invalid(format!("{name} must be positive, got {v}")));
                }
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::invalid("max_steps must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StepCounter {
    accepted: usize,
    rejected: usize,
    limit: usize,
}

impl StepCounter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn check(&self) -> std::result::Result<(), SolverError> {
        if self.accepted + self.rejected >= self.limit {
            Err(SolverError::MaxStepsExceeded(self.limit))
        } else {
            Ok(())
        }
    }
}

fn failure(mu: f64, time: f64, err: SolverError) -> SimError {
    SimError::IntegrationFailure {
        mu,
        time,
        reason: err.to_string(),
    }
}

fn finite_state(y: &DVector<f64>) -> Option<PhaseState> {
    PhaseState::from_vector(y).filter(PhaseState::is_finite)
}

/// Integrate `model` from `initial` over every point of `grid`
///
/// The first entry of the result is `initial` itself, and the result has
/// exactly `grid.len()` entries. A single-point grid yields just the
/// initial state.
pub fn integrate(
    model: &VanDerPol,
    initial: PhaseState,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
) -> Result<Trajectory> {
    if !initial.is_finite() {
        return Err(SimError::invalid(format!(
            "initial state must be finite, got ({}, {})",
            initial.position, initial.momentum
        )));
    }
    settings.validate()?;

    let mut states = Vec::with_capacity(grid.len());
    states.push(initial);

    let counter = match settings.method {
        Method::Rk4 => fixed_step(model, initial, grid, settings, &mut states)?,
        Method::Dopri54 => adaptive_step(model, initial, grid, settings, &mut states)?,
    };

    debug!(
        "{} mu = {}: {} steps accepted, {} rejected, {} samples",
        settings.method.as_str(),
        model.mu(),
        counter.accepted,
        counter.rejected,
        states.len()
    );

    Ok(Trajectory::new(model.mu(), states))
}

fn fixed_step(
    model: &VanDerPol,
    initial: PhaseState,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
    states: &mut Vec<PhaseState>,
) -> Result<StepCounter> {
    let mu = model.mu();
    let mut solver = RK4::new(initial.to_vector());
    let mut counter = StepCounter::new(settings.max_steps);

    for (t0, t1) in grid.intervals() {
        let span = t1 - t0;
        let substeps = match settings.max_step {
            Some(h) => (span / h).ceil().max(1.0) as usize,
            None => 1,
        };
        let dt = span / substeps as f64;

        for k in 0..substeps {
            let t = t0 + k as f64 * dt;
            counter.check().map_err(|e| failure(mu, t, e))?;
            solver
                .full_step(|y, tau| model.rhs(y, t + tau), dt)
                .map_err(|e| failure(mu, t, e))?;
            counter.accepted += 1;
        }

        let state = finite_state(solver.state())
            .ok_or_else(|| failure(mu, t1, SolverError::NonFiniteState))?;
        states.push(state);
    }

    Ok(counter)
}

fn adaptive_step(
    model: &VanDerPol,
    initial: PhaseState,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
    states: &mut Vec<PhaseState>,
) -> Result<StepCounter> {
    let mu = model.mu();
    let mut solver = RKDP54::with_tolerances(initial.to_vector(), settings.atol, settings.rtol);
    let mut counter = StepCounter::new(settings.max_steps);

    let max_step = settings.max_step.unwrap_or(f64::INFINITY);
    let first_interval = grid.intervals().next().map(|(a, b)| b - a).unwrap_or(1.0);
    let mut dt = settings.initial_step.unwrap_or(first_interval).min(max_step);

    for (t0, t1) in grid.intervals() {
        let mut t = t0;

        while t < t1 {
            counter.check().map_err(|e| failure(mu, t, e))?;

            let remaining = t1 - t;
            // Stretch a step that would leave a sliver before the output time
            let last = dt >= remaining * 0.999;
            let h = if last { remaining } else { dt };

            let result = solver
                .full_step(|y, tau| model.rhs(y, t + tau), h)
                .map_err(|e| failure(mu, t, e))?;
            let scale = result.scale.unwrap_or(1.0);

            if result.success {
                if finite_state(solver.state()).is_none() {
                    return Err(failure(mu, t + h, SolverError::NonFiniteState));
                }
                counter.accepted += 1;
                t = if last { t1 } else { t + h };

                let proposed = h * scale;
                let next = if last && scale >= 1.0 { proposed.max(dt) } else { proposed };
                dt = next.min(max_step);
            } else {
                solver.revert().map_err(|e| failure(mu, t, e))?;
                counter.rejected += 1;

                dt = h * scale;
                if dt < settings.min_step {
                    return Err(failure(
                        mu,
                        t,
                        SolverError::TimestepTooSmall {
                            dt,
                            dt_min: settings.min_step,
                        },
                    ));
                }
            }
        }

        let state = finite_state(solver.state())
            .ok_or_else(|| failure(mu, t1, SolverError::NonFiniteState))?;
        states.push(state);
    }

    Ok(counter)
}

/// Integrate every damping value in `mu_values`, preserving their order
///
/// The first failing parameter aborts the sweep.
pub fn sweep(
    mu_values: &[f64],
    initial: PhaseState,
    grid: &TimeGrid,
    settings: &IntegratorSettings,
) -> Result<Vec<Trajectory>> {
    mu_values
        .iter()
        .map(|&mu| {
            let model = VanDerPol::new(mu)?;
            integrate(&model, initial, grid, settings)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid() -> TimeGrid {
        TimeGrid::linspace(0.0, 2.0 * std::f64::consts::PI, 200).unwrap()
    }

    #[test]
    fn test_harmonic_solution_rk4() {
        let model = VanDerPol::new(0.0).unwrap();
        let traj = integrate(
            &model,
            PhaseState::new(1.0, 0.0),
            &grid(),
            &IntegratorSettings::default(),
        )
        .unwrap();

        // x(t) = cos(t), p(t) = -sin(t)
        for (t, state) in grid().iter().zip(traj.states()) {
            assert_relative_eq!(state.position, t.cos(), epsilon = 1e-6);
            assert_relative_eq!(state.momentum, -t.sin(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_harmonic_solution_dopri() {
        let model = VanDerPol::new(0.0).unwrap();
        let settings = IntegratorSettings::with_method(Method::Dopri54);
        let traj = integrate(&model, PhaseState::new(1.0, 0.0), &grid(), &settings).unwrap();

        let end = traj.last().unwrap();
        assert_relative_eq!(end.position, 1.0, epsilon = 1e-5);
        assert_relative_eq!(end.momentum, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_substeps_improve_rk4() {
        let model = VanDerPol::new(1.0).unwrap();
        let coarse_grid = TimeGrid::linspace(0.0, 5.0, 6).unwrap();
        let initial = PhaseState::new(0.0, 1.0);

        let reference = integrate(
            &model,
            initial,
            &coarse_grid,
            &IntegratorSettings {
                max_step: Some(1e-3),
                ..IntegratorSettings::default()
            },
        )
        .unwrap();
        let coarse = integrate(&model, initial, &coarse_grid, &IntegratorSettings::default()).unwrap();
        let refined = integrate(
            &model,
            initial,
            &coarse_grid,
            &IntegratorSettings {
                max_step: Some(0.05),
                ..IntegratorSettings::default()
            },
        )
        .unwrap();

        let err = |t: &Trajectory| {
            let (a, b) = (t.last().unwrap(), reference.last().unwrap());
            (a.position - b.position).abs() + (a.momentum - b.momentum).abs()
        };
        assert!(err(&refined) < err(&coarse));
        assert!(err(&refined) < 1e-3);
    }

    #[test]
    fn test_step_budget_exhaustion_fails() {
        let model = VanDerPol::new(1.0).unwrap();
        let settings = IntegratorSettings {
            max_steps: 10,
            ..IntegratorSettings::default()
        };

        let err = integrate(&model, PhaseState::new(0.0, 1.0), &grid(), &settings).unwrap_err();
        assert!(matches!(err, SimError::IntegrationFailure { mu, .. } if mu == 1.0));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let model = VanDerPol::new(1.0).unwrap();
        let bad = [
            IntegratorSettings {
                atol: 0.0,
                ..IntegratorSettings::default()
            },
            IntegratorSettings {
                max_step: Some(-1.0),
                ..IntegratorSettings::default()
            },
            IntegratorSettings {
                max_steps: 0,
                ..IntegratorSettings::default()
            },
        ];

        for settings in &bad {
            let err = integrate(&model, PhaseState::new(0.0, 1.0), &grid(), settings).unwrap_err();
            assert!(matches!(err, SimError::InvalidArgument(_)), "{settings:?}");
        }
    }

    #[test]
    fn test_sweep_preserves_insertion_order() {
        let mus = [2.0, 0.0, 1.0];
        let trajs = sweep(&mus, PhaseState::new(0.0, 1.0), &grid(), &IntegratorSettings::default())
            .unwrap();

        let got: Vec<f64> = trajs.iter().map(Trajectory::mu).collect();
        assert_eq!(got, mus);
    }

    #[test]
    fn test_sweep_rejects_non_finite_mu() {
        let err = sweep(
            &[0.0, f64::NAN],
            PhaseState::new(0.0, 1.0),
            &grid(),
            &IntegratorSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }
}
