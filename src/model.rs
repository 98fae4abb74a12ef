//! Van der Pol oscillator model
//!
//! ```text
//! dx/dt = p
//! dp/dt = mu (1 - x²) p - x
//! ```
//!
//! `mu = 0` recovers the classical harmonic oscillator.

use nalgebra::DVector;

use crate::error::{Result, SimError};

/// Damping values swept by a default run, in plotting order
pub const DEFAULT_MU_SWEEP: [f64; 3] = [0.0, 1.0, 2.0];

/// Instantaneous condition of the oscillator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseState {
    pub position: f64,
    pub momentum: f64,
}

impl PhaseState {
    pub const fn new(position: f64, momentum: f64) -> Self {
        Self { position, momentum }
    }

    /// `x² + p²`, conserved by the undamped oscillator
    pub fn energy(&self) -> f64 {
        self.position * self.position + self.momentum * self.momentum
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.momentum.is_finite()
    }

    /// Solver representation `[x, p]`
    pub fn to_vector(&self) -> DVector<f64> {
        DVector::from_vec(vec![self.position, self.momentum])
    }

    /// Inverse of [`PhaseState::to_vector`]; `None` unless the vector has two entries
    pub fn from_vector(v: &DVector<f64>) -> Option<Self> {
        match v.as_slice() {
            [x, p] => Some(Self::new(*x, *p)),
            _ => None,
        }
    }
}

/// Van der Pol oscillator with damping coefficient `mu`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanDerPol {
    mu: f64,
}

impl VanDerPol {
    /// Create the model; `mu` must be finite
    pub fn new(mu: f64) -> Result<Self> {
        if !mu.is_finite() {
            return Err(SimError::invalid(format!("mu must be finite, got {mu}")));
        }
        Ok(Self { mu })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Time derivative of `state`
    ///
    /// The system is autonomous, `_t` only has to be finite.
    pub fn derivative(&self, state: &PhaseState, t: f64) -> Result<PhaseState> {
        if !state.is_finite() || !t.is_finite() {
            return Err(SimError::invalid(format!(
                "non-finite model input: state = ({}, {}), t = {t}",
                state.position, state.momentum
            )));
        }
        Ok(self.rates(state.position, state.momentum))
    }

    /// Right-hand side in solver form, without input checks
    ///
    /// # Panics
    ///
    /// Panics if `y` has fewer than two components.
    pub fn rhs(&self, y: &DVector<f64>, _t: f64) -> DVector<f64> {
        debug_assert_eq!(y.len(), 2, "state vector must be (x, p)");
        let rates = self.rates(y[0], y[1]);
        DVector::from_vec(vec![rates.position, rates.momentum])
    }

    fn rates(&self, x: f64, p: f64) -> PhaseState {
        PhaseState {
            position: p,
            momentum: self.mu * (1.0 - x * x) * p - x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derivative_matches_equation() {
        let model = VanDerPol::new(1.5).unwrap();
        let d = model.derivative(&PhaseState::new(2.0, -0.5), 0.0).unwrap();

        assert_relative_eq!(d.position, -0.5);
        // 1.5 * (1 - 4) * (-0.5) - 2 = 0.25
        assert_relative_eq!(d.momentum, 0.25);
    }

    #[test]
    fn test_zero_mu_is_harmonic() {
        let model = VanDerPol::new(0.0).unwrap();
        let d = model.derivative(&PhaseState::new(0.3, 0.7), 12.0).unwrap();
        assert_eq!(d, PhaseState::new(0.7, -0.3));
    }

    #[test]
    fn test_rhs_agrees_with_derivative() {
        let model = VanDerPol::new(2.0).unwrap();
        let state = PhaseState::new(-1.2, 0.4);

        let checked = model.derivative(&state, 0.0).unwrap();
        let raw = PhaseState::from_vector(&model.rhs(&state.to_vector(), 0.0)).unwrap();
        assert_eq!(checked, raw);
    }

    #[test]
    #[should_panic]
    fn test_rhs_panics_on_short_vector() {
        let model = VanDerPol::new(1.0).unwrap();
        model.rhs(&DVector::from_vec(vec![1.0]), 0.0);
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let model = VanDerPol::new(1.0).unwrap();
        assert!(matches!(
            model.derivative(&PhaseState::new(f64::NAN, 0.0), 0.0),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(model
            .derivative(&PhaseState::new(0.0, f64::INFINITY), 0.0)
            .is_err());
        assert!(model.derivative(&PhaseState::new(0.0, 1.0), f64::NAN).is_err());
        assert!(VanDerPol::new(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_vector_round_trip_requires_two_entries() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(PhaseState::from_vector(&v), None);
        assert_relative_eq!(PhaseState::new(3.0, 4.0).energy(), 25.0);
    }
}
