//! Monte Carlo diagnostic test estimates against Bayes' rule

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vdpsim::diagnostic::DiagnosticTest;

#[test]
fn test_default_estimate_matches_exact() {
    let test = DiagnosticTest::default();
    let mut rng = StdRng::seed_from_u64(42);
    let est = test.simulate(200_000, &mut rng).unwrap();
    let exact = test.exact();

    assert_relative_eq!(est.p_negative(), exact.p_negative, epsilon = 5e-3);
    assert_relative_eq!(
        est.p_sick_given_negative().unwrap(),
        exact.p_sick_given_negative,
        epsilon = 4e-4
    );
    // About 1% of the sample is sick
    assert!(est.sick > 1_500 && est.sick < 2_500, "sick = {}", est.sick);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let test = DiagnosticTest::new(0.2, 0.75).unwrap();

    let a = test.simulate(5_000, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = test.simulate(5_000, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_high_prevalence_estimate() {
    let test = DiagnosticTest::new(0.5, 0.8).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    let est = test.simulate(100_000, &mut rng).unwrap();

    // P(neg) = 0.5 * 0.2 + 0.5 * 0.8 = 0.5, P(sick | neg) = 0.1 / 0.5 = 0.2
    assert_relative_eq!(est.p_negative(), 0.5, epsilon = 1e-2);
    assert_relative_eq!(est.p_sick_given_negative().unwrap(), 0.2, epsilon = 1e-2);
    assert!(est.false_negatives <= est.sick);
    assert!(est.false_negatives <= est.negatives);
}
