//! Output time grids

use crate::error::{Result, SimError};

/// Largest number of samples a grid may hold
pub const MAX_GRID_POINTS: usize = 10_000_000;

fn check_size(n: f64) -> Result<()> {
    if n > MAX_GRID_POINTS as f64 {
        return Err(SimError::invalid(format!(
            "time grid would hold {n:e} points, the limit is {MAX_GRID_POINTS}"
        )));
    }
    Ok(())
}

/// Strictly increasing sequence of finite sample times
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Points `start, start + step, ...` strictly below `stop`
    ///
    /// Matches `numpy.arange`: the grid has `ceil((stop - start) / step)`
    /// points, so a step larger than the span yields the single point `start`.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(SimError::invalid(format!(
                "grid bounds must be finite, got [{start}, {stop})"
            )));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(SimError::invalid(format!(
                "step size must be positive and finite, got {step}"
            )));
        }
        if stop <= start {
            return Err(SimError::invalid(format!(
                "integration time must be positive, got span [{start}, {stop})"
            )));
        }

        let count = ((stop - start) / step).ceil();
        check_size(count)?;
        let n = count as usize;
        let points = (0..n.max(1)).map(|i| start + i as f64 * step).collect();
        Self::from_points(points)
    }

    /// `n` evenly spaced points from `start` to `stop`, both included
    pub fn linspace(start: f64, stop: f64, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(SimError::invalid("time grid must contain at least one point"));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(SimError::invalid(format!(
                "grid bounds must be finite, got [{start}, {stop}]"
            )));
        }
        check_size(n as f64)?;
        if n == 1 {
            return Self::from_points(vec![start]);
        }

        let step = (stop - start) / (n - 1) as f64;
        let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
        points[n - 1] = stop;
        Self::from_points(points)
    }

    /// Validate an explicit list of sample times
    pub fn from_points(points: Vec<f64>) -> Result<Self> {
        if points.is_empty() {
            return Err(SimError::invalid("time grid must contain at least one point"));
        }
        if let Some(bad) = points.iter().find(|t| !t.is_finite()) {
            return Err(SimError::invalid(format!("non-finite grid point {bad}")));
        }
        if let Some(w) = points.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SimError::invalid(format!(
                "grid must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed grid
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.points.iter()
    }

    /// Consecutive `(t_i, t_{i+1})` pairs
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}
