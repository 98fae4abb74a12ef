//! Numerical integration solvers
//!
//! Provides the explicit Runge-Kutta methods used by the integrator driver:
//! - Classic fixed-step RK4
//! - Dormand-Prince 5(4) with embedded error estimate (RKDP54)

mod base;
mod rk4;
mod rkdp54;

pub use base::*;
pub use rk4::RK4;
pub use rkdp54::RKDP54;
