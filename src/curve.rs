//! Sampled scalar functions for quick plots

use crate::grid::TimeGrid;

/// `sin(x) / x`, continued with `sinc(0) = 1`
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

/// `(x, f(x))` for every grid point
pub fn sample<F>(grid: &TimeGrid, f: F) -> Vec<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    grid.iter().map(|&x| (x, f(x))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_sinc_values() {
        assert_eq!(sinc(0.0), 1.0);
        assert_relative_eq!(sinc(PI), 0.0, epsilon = 1e-15);
        assert_relative_eq!(sinc(PI / 2.0), 2.0 / PI);
        assert_relative_eq!(sinc(1e-8), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_over_grid() {
        let grid = TimeGrid::linspace(0.02, 10.0, 100).unwrap();
        let points = sample(&grid, sinc);

        assert_eq!(points.len(), 100);
        assert_eq!(points[0].0, 0.02);
        assert_eq!(points[99].0, 10.0);
        assert_relative_eq!(points[99].1, 10f64.sin() / 10.0);
    }
}
