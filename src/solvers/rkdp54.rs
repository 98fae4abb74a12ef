//! Dormand-Prince 5(4) adaptive Runge-Kutta solver

use nalgebra::DVector;
use std::collections::VecDeque;

use super::{ExplicitSolver, Solver, SolverError, SolverStepResult};

/// Dormand-Prince 5(4) adaptive solver (DOPRI5)
///
/// Seven-stage, 5th order Runge-Kutta method with embedded 4th order
/// error estimate for adaptive timestepping.
///
/// The industry-standard adaptive explicit solver and the basis of MATLAB's
/// `ode45`. Has the FSAL property (First Same As Last - not exploited in
/// this implementation, so all seven stages are evaluated each step).
///
/// # Characteristics
/// - Order: 5 (propagating) / 4 (embedded)
/// - Stages: 7
/// - Explicit, adaptive timestep
/// - Error estimation via embedded method
///
/// # References
/// - Dormand, J. R., & Prince, P. J. (1980). "A family of embedded
///   Runge-Kutta formulae". Journal of Computational and Applied
///   Mathematics, 6(1), 19-26.
/// - Shampine, L. F., & Reichelt, M. W. (1997). "The MATLAB ODE Suite".
///   SIAM Journal on Scientific Computing, 18(1), 1-22.
#[derive(Debug, Clone)]
pub struct RKDP54 {
    state: DVector<f64>,
    initial: DVector<f64>,
    history: VecDeque<DVector<f64>>,
    slopes: Vec<DVector<f64>>,
    stage: usize,
    tol_abs: f64,
    tol_rel: f64,
    beta: f64,
}

impl RKDP54 {
    /// Create a new RKDP54 solver with the given initial state
    ///
    /// # Arguments
    /// * `initial` - Initial state vector
    ///
    /// Uses an absolute tolerance of 1e-8 and a relative tolerance of 1e-6.
    pub fn new(initial: DVector<f64>) -> Self {
        Self::with_tolerances(initial, 1e-8, 1e-6)
    }

    /// Create a new RKDP54 solver with custom tolerances
    pub fn with_tolerances(initial: DVector<f64>, tol_abs: f64, tol_rel: f64) -> Self {
        let n = initial.len();
        Self {
            state: initial.clone(),
            initial,
            history: VecDeque::with_capacity(2),
            slopes: vec![DVector::zeros(n); 7],
            stage: 0,
            tol_abs,
            tol_rel,
            beta: 0.9, // Safety factor
        }
    }

    /// Absolute and relative tolerance
    pub fn tolerances(&self) -> (f64, f64) {
        (self.tol_abs, self.tol_rel)
    }

    /// Compute error norm and timestep scale factor
    fn error_controller(&self, dt: f64) -> (bool, f64, f64) {
        // Difference between 5th and 4th order weights
        // TR = [71/57600, 0, -71/16695, 71/1920, -17253/339200, 22/525, -1/40]
        let tr = [
            71.0 / 57600.0,
            0.0,
            -71.0 / 16695.0,
            71.0 / 1920.0,
            -17253.0 / 339200.0,
            22.0 / 525.0,
            -1.0 / 40.0,
        ];

        let mut error_slope = DVector::zeros(self.state.len());
        for (i, &coef) in tr.iter().enumerate() {
            error_slope += coef * &self.slopes[i];
        }

        let scale = self.state.map(|x| self.tol_abs + self.tol_rel * x.abs());
        let scaled_error = (dt * &error_slope).component_div(&scale).map(|e| e.abs());

        // A NaN anywhere poisons the estimate instead of being skipped by max()
        let error_norm = if scaled_error.iter().any(|e| !e.is_finite()) {
            f64::INFINITY
        } else {
            scaled_error.max().max(1e-16)
        };

        let success = error_norm <= 1.0;

        // Exponent uses the embedded (lower) order
        let order = 4.0;
        let timestep_scale = (self.beta / error_norm.powf(1.0 / (order + 1.0))).clamp(0.1, 10.0);

        (success, error_norm, timestep_scale)
    }
}

impl Solver for RKDP54 {
    fn state(&self) -> &DVector<f64> {
        &self.state
    }

    fn set_state(&mut self, state: DVector<f64>) {
        self.state = state;
    }

    fn buffer(&mut self, _dt: f64) {
        if self.history.len() >= 2 {
            self.history.pop_back();
        }
        self.history.push_front(self.state.clone());
        self.stage = 0;
    }

    fn revert(&mut self) -> Result<(), SolverError> {
        self.state = self.history.pop_front().ok_or(SolverError::EmptyHistory)?;
        self.stage = 0;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = self.initial.clone();
        self.history.clear();
        self.stage = 0;
    }

    fn order(&self) -> usize {
        5
    }

    fn stages(&self) -> usize {
        7
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}

impl ExplicitSolver for RKDP54 {
    fn step<F>(&mut self, mut f: F, dt: f64) -> Result<SolverStepResult, SolverError>
    where
        F: FnMut(&DVector<f64>, f64) -> DVector<f64>,
    {
        let x0 = self.history.front().ok_or(SolverError::EmptyHistory)?;

        // c (evaluation times) = [0, 1/5, 3/10, 4/5, 8/9, 1, 1]
        let c = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

        // Row i builds the input of stage i + 1; the last row is the 5th order solution
        #[rustfmt::skip]
        let a: [&[f64]; 6] = [
            &[1.0/5.0],
            &[3.0/40.0, 9.0/40.0],
            &[44.0/45.0, -56.0/15.0, 32.0/9.0],
            &[19372.0/6561.0, -25360.0/2187.0, 64448.0/6561.0, -212.0/729.0],
            &[9017.0/3168.0, -355.0/33.0, 46732.0/5247.0, 49.0/176.0, -5103.0/18656.0],
            &[35.0/384.0, 0.0, 500.0/1113.0, 125.0/192.0, -2187.0/6784.0, 11.0/84.0],
        ];

        self.slopes[self.stage] = f(&self.state, c[self.stage] * dt);

        if self.stage < 6 {
            let mut slope_sum = DVector::zeros(x0.len());
            for (i, &coef) in a[self.stage].iter().enumerate() {
                slope_sum += coef * &self.slopes[i];
            }
            self.state = x0 + dt * slope_sum;
            self.stage += 1;

            Ok(SolverStepResult::default())
        } else {
            let (success, error_norm, scale) = self.error_controller(dt);
            self.stage = 0;

            Ok(SolverStepResult {
                success,
                error_norm,
                scale: Some(scale),
            })
        }
    }
}
