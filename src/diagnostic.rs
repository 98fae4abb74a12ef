//! Monte Carlo estimate of conditional probabilities for a binary diagnostic test
//!
//! Each sampled individual is sick with probability `prevalence`; the test
//! then reports the true status with probability `accuracy` and the flipped
//! status otherwise.

use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::Bernoulli;

use crate::error::{Result, SimError};

/// Test characteristics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticTest {
    prevalence: f64,
    accuracy: f64,
}

impl Default for DiagnosticTest {
    /// One sick person in a population of 100, 90% correct classification
    fn default() -> Self {
        Self {
            prevalence: 0.01,
            accuracy: 0.9,
        }
    }
}

/// Closed-form probabilities from Bayes' rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub p_negative: f64,
    pub p_sick_given_negative: f64,
}

/// Counts collected by [`DiagnosticTest::simulate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloEstimate {
    pub samples: usize,
    pub sick: usize,
    pub negatives: usize,
    /// Sick individuals who tested negative
    pub false_negatives: usize,
}

impl MonteCarloEstimate {
    /// P(negative test)
    pub fn p_negative(&self) -> f64 {
        self.negatives as f64 / self.samples as f64
    }

    /// P(sick | negative test); `None` when no test came back negative
    pub fn p_sick_given_negative(&self) -> Option<f64> {
        (self.negatives > 0).then(|| self.false_negatives as f64 / self.negatives as f64)
    }
}

impl DiagnosticTest {
    pub fn new(prevalence: f64, accuracy: f64) -> Result<Self> {
        for (name, value) in [("prevalence", prevalence), ("accuracy", accuracy)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::invalid(format!(
                    "{name} must be a probability in [0, 1], got {value}"
                )));
            }
        }
        Ok(Self {
            prevalence,
            accuracy,
        })
    }

    pub fn prevalence(&self) -> f64 {
        self.prevalence
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Exact values the Monte Carlo estimate converges to
    pub fn exact(&self) -> Probabilities {
        let (pi, a) = (self.prevalence, self.accuracy);
        let false_negative = pi * (1.0 - a);
        let p_negative = false_negative + (1.0 - pi) * a;

        Probabilities {
            p_negative,
            p_sick_given_negative: if p_negative > 0.0 {
                false_negative / p_negative
            } else {
                0.0
            },
        }
    }

    /// Draw `samples` individuals and test each one
    pub fn simulate<R: Rng + ?Sized>(&self, samples: usize, rng: &mut R) -> Result<MonteCarloEstimate> {
        if samples == 0 {
            return Err(SimError::invalid("at least one sample is required"));
        }

        let sick_dist = Bernoulli::new(self.prevalence)
            .map_err(|e| SimError::invalid(format!("prevalence: {e}")))?;
        let correct_dist = Bernoulli::new(self.accuracy)
            .map_err(|e| SimError::invalid(format!("accuracy: {e}")))?;

        let mut estimate = MonteCarloEstimate {
            samples,
            sick: 0,
            negatives: 0,
            false_negatives: 0,
        };

        for _ in 0..samples {
            let sick = sick_dist.sample(rng);
            let correct = correct_dist.sample(rng);
            // Positive exactly when the status is sick and read correctly, or healthy and flipped
            let positive = sick == correct;

            if sick {
                estimate.sick += 1;
            }
            if !positive {
                estimate.negatives += 1;
                if sick {
                    estimate.false_negatives += 1;
                }
            }
        }

        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_exact_default_values() {
        let exact = DiagnosticTest::default().exact();
        assert_relative_eq!(exact.p_negative, 0.892, epsilon = 1e-12);
        assert_relative_eq!(exact.p_sick_given_negative, 0.001 / 0.892, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_test_has_no_false_negatives() {
        let test = DiagnosticTest::new(0.3, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let est = test.simulate(10_000, &mut rng).unwrap();

        assert_eq!(est.false_negatives, 0);
        assert_eq!(est.negatives, est.samples - est.sick);
        assert_eq!(est.p_sick_given_negative(), Some(0.0));
    }

    #[test]
    fn test_always_wrong_test_flips_everyone() {
        let test = DiagnosticTest::new(1.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let est = test.simulate(100, &mut rng).unwrap();

        assert_eq!(est.sick, 100);
        assert_eq!(est.negatives, 100);
        assert_eq!(est.p_sick_given_negative(), Some(1.0));
    }

    #[test]
    fn test_no_negatives_gives_none() {
        let test = DiagnosticTest::new(1.0, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let est = test.simulate(50, &mut rng).unwrap();

        assert_eq!(est.negatives, 0);
        assert_eq!(est.p_negative(), 0.0);
        assert_eq!(est.p_sick_given_negative(), None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(DiagnosticTest::new(-0.1, 0.9).is_err());
        assert!(DiagnosticTest::new(0.1, 1.5).is_err());
        assert!(DiagnosticTest::new(f64::NAN, 0.5).is_err());

        let mut rng = StdRng::seed_from_u64(0);
        let err = DiagnosticTest::default().simulate(0, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }
}
