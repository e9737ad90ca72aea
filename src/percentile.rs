//! Percentile reduction of the simulation matrix
//!
//! Collapses the N x H price matrix into per-period quantile bands. Each
//! future period is reduced independently (no smoothing across periods):
//! sort the N simulated prices at that period and interpolate linearly
//! between order statistics at `rank = level * (N - 1)`.

use crate::error::{DashboardError, DashboardResult};
use crate::simulate::SimulationMatrix;
use crate::types::PercentileBand;

/// Compute one band per requested level, each with `horizon` values.
///
/// Levels must be finite and inside the open interval (0, 1); anything else
/// is [`DashboardError::InvalidParameters`]. With a single simulated path,
/// every level collapses to that path's value.
pub fn summarize(
    matrix: &SimulationMatrix,
    levels: &[f64],
) -> DashboardResult<Vec<PercentileBand>> {
    if levels.is_empty() {
        return Err(DashboardError::InvalidParameters(
            "at least one percentile level is required".to_string(),
        ));
    }
    for &level in levels {
        if !level.is_finite() || level <= 0.0 || level >= 1.0 {
            return Err(DashboardError::InvalidParameters(format!(
                "percentile level {level} is outside (0, 1)"
            )));
        }
    }

    let mut bands: Vec<PercentileBand> = levels
        .iter()
        .map(|&level| PercentileBand {
            level,
            values: Vec::with_capacity(matrix.horizon()),
        })
        .collect();

    let mut column = Vec::with_capacity(matrix.simulations());
    for period in 0..matrix.horizon() {
        column.clear();
        column.extend(matrix.column(period));
        column.sort_unstable_by(f64::total_cmp);

        for band in &mut bands {
            band.values.push(quantile_sorted(&column, band.level));
        }
    }

    Ok(bands)
}

/// Linear-interpolation quantile over an ascending-sorted slice
fn quantile_sorted(sorted: &[f64], level: f64) -> f64 {
    let rank = level * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = rank - lower as f64;
        sorted[lower] + fraction * (sorted[upper] - sorted[lower])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CancelToken;
    use crate::simulate::PathSimulator;
    use crate::types::ReturnModel;
    use approx::assert_relative_eq;

    fn sample_matrix(simulations: usize, horizon: usize) -> SimulationMatrix {
        let model = ReturnModel {
            mean: 0.001,
            stddev: 0.05,
            basis_count: 29,
        };
        PathSimulator::new(11)
            .simulate(100.0, &model, horizon, simulations, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn test_quantile_interpolates_between_order_statistics() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // rank = 0.5 * 3 = 1.5 -> halfway between 20 and 30
        assert_relative_eq!(quantile_sorted(&sorted, 0.5), 25.0);
        // rank = 0.1 * 3 = 0.3 -> 10 + 0.3 * 10
        assert_relative_eq!(quantile_sorted(&sorted, 0.1), 13.0);
        // rank = 0.9 * 3 = 2.7 -> 30 + 0.7 * 10
        assert_relative_eq!(quantile_sorted(&sorted, 0.9), 37.0);
    }

    #[test]
    fn test_bands_are_monotonic_across_levels() {
        let matrix = sample_matrix(500, 20);
        let bands = summarize(&matrix, &[0.1, 0.5, 0.9]).unwrap();
        for period in 0..20 {
            assert!(bands[0].values[period] <= bands[1].values[period]);
            assert!(bands[1].values[period] <= bands[2].values[period]);
        }
    }

    #[test]
    fn test_single_path_collapses_all_levels() {
        let matrix = sample_matrix(1, 8);
        let bands = summarize(&matrix, &[0.1, 0.5, 0.9]).unwrap();
        let path: Vec<f64> = matrix.path(0).to_vec();
        for band in &bands {
            assert_eq!(band.values, path);
        }
    }

    #[test]
    fn test_level_bounds_rejected() {
        let matrix = sample_matrix(10, 3);
        assert!(summarize(&matrix, &[0.0]).is_err());
        assert!(summarize(&matrix, &[1.0]).is_err());
        assert!(summarize(&matrix, &[-0.1]).is_err());
        assert!(summarize(&matrix, &[1.5]).is_err());
        assert!(summarize(&matrix, &[f64::NAN]).is_err());
        assert!(summarize(&matrix, &[]).is_err());
    }

    #[test]
    fn test_each_period_reduced_independently() {
        let matrix = sample_matrix(100, 5);
        let all = summarize(&matrix, &[0.5]).unwrap();

        // Recompute period 3 by hand
        let mut column: Vec<f64> = matrix.column(3).collect();
        column.sort_unstable_by(f64::total_cmp);
        assert_relative_eq!(all[0].values[3], quantile_sorted(&column, 0.5));
    }
}
