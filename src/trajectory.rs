//! Integrated trajectories

use crate::model::PhaseState;

/// States produced by one integration, one per grid point
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    mu: f64,
    states: Vec<PhaseState>,
}

impl Trajectory {
    pub(crate) fn new(mu: f64, states: Vec<PhaseState>) -> Self {
        Self { mu, states }
    }

    /// Damping parameter the trajectory was integrated with
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Legend label keyed by the parameter
    pub fn label(&self) -> String {
        format!("mu = {}", self.mu)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[PhaseState] {
        &self.states
    }

    pub fn first(&self) -> Option<&PhaseState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&PhaseState> {
        self.states.last()
    }

    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s.position)
    }

    pub fn momenta(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s.momentum)
    }

    pub fn energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(PhaseState::energy)
    }

    /// Number of sign changes of the position component
    pub fn position_sign_changes(&self) -> usize {
        self.states
            .windows(2)
            .filter(|w| w[0].position * w[1].position < 0.0)
            .count()
    }
}
