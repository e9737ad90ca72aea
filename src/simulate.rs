//! Monte Carlo path simulation
//!
//! Runs N independent geometric-random-walk price paths forward for H
//! future periods. Within a path, periods compound sequentially (period t
//! depends on period t-1); across paths there is no shared state, so the
//! fan-out is parallelized over the rayon worker pool in batches.
//!
//! Determinism: every path draws from its own RNG, seeded from the master
//! seed and the path index via a splitmix64 mix. Results are therefore
//! bit-identical for a fixed seed regardless of worker scheduling or batch
//! size.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::debug;

use crate::common::CancelToken;
use crate::error::{DashboardError, DashboardResult};
use crate::types::ReturnModel;

/// Paths simulated between cancellation checks
const DEFAULT_BATCH_SIZE: usize = 256;

/// N x H matrix of simulated prices, row-major: one contiguous row per path.
///
/// Columns are correlated within a path (sequential compounding); rows are
/// mutually independent.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationMatrix {
    values: Vec<f64>,
    simulations: usize,
    horizon: usize,
}

impl SimulationMatrix {
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Prices of one path across all periods
    pub fn path(&self, index: usize) -> &[f64] {
        let start = index * self.horizon;
        &self.values[start..start + self.horizon]
    }

    /// Prices of all paths at one future period
    pub fn column(&self, period: usize) -> impl Iterator<Item = f64> + '_ {
        self.values[period..].iter().step_by(self.horizon).copied()
    }
}

/// Geometric random-walk simulator with deterministic per-path seeding
#[derive(Debug, Clone)]
pub struct PathSimulator {
    seed: u64,
    batch_size: usize,
}

impl PathSimulator {
    pub fn new(seed: u64) -> Self {
        PathSimulator {
            seed,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override how many paths run between cancellation checks
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Simulate `simulations` paths of `horizon` periods each.
    ///
    /// Per path: running price starts at `initial_price`; each period draws
    /// `r ~ Normal(model.mean, model.stddev)` and compounds
    /// `price *= 1 + r`. Prices are not clamped: a path can go negative
    /// under very negative returns, an accepted property of the simple
    /// model.
    ///
    /// The token is checked between path batches; on cancellation the whole
    /// computation aborts with [`DashboardError::Cancelled`] and no partial
    /// matrix is returned.
    pub fn simulate(
        &self,
        initial_price: f64,
        model: &ReturnModel,
        horizon: usize,
        simulations: usize,
        cancel: &CancelToken,
    ) -> DashboardResult<SimulationMatrix> {
        if horizon < 1 || simulations < 1 {
            return Err(DashboardError::InvalidParameters(format!(
                "horizon ({horizon}) and simulations ({simulations}) must both be at least 1"
            )));
        }
        if !model.mean.is_finite() || !model.stddev.is_finite() || model.stddev < 0.0 {
            return Err(DashboardError::InvalidParameters(format!(
                "return model is malformed: mean={}, stddev={}",
                model.mean, model.stddev
            )));
        }

        // std_dev = 0 is a valid constant distribution; only negative/NaN fail above
        let normal = Normal::new(model.mean, model.stddev).map_err(|e| {
            DashboardError::InvalidParameters(format!("normal distribution: {e}"))
        })?;

        debug!(
            simulations,
            horizon, seed = self.seed, "running path simulation"
        );

        let mut values = vec![0.0_f64; simulations * horizon];
        for (batch_index, batch) in values.chunks_mut(self.batch_size * horizon).enumerate() {
            if cancel.is_cancelled() {
                return Err(DashboardError::Cancelled);
            }

            let first_path = batch_index * self.batch_size;
            batch
                .par_chunks_mut(horizon)
                .enumerate()
                .for_each(|(offset, row)| {
                    let path_index = (first_path + offset) as u64;
                    let mut rng = StdRng::seed_from_u64(path_seed(self.seed, path_index));
                    let mut price = initial_price;
                    for slot in row {
                        price *= 1.0 + normal.sample(&mut rng);
                        *slot = price;
                    }
                });
        }

        Ok(SimulationMatrix {
            values,
            simulations,
            horizon,
        })
    }
}

/// Derive the RNG seed for one path from the master seed and path index.
///
/// splitmix64 finalizer over `master + index * golden_gamma`; adjacent path
/// indices map to statistically independent streams.
fn path_seed(master: u64, index: u64) -> u64 {
    let mut z = master.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model(mean: f64, stddev: f64) -> ReturnModel {
        ReturnModel {
            mean,
            stddev,
            basis_count: 29,
        }
    }

    #[test]
    fn test_fixed_seed_is_bit_reproducible() {
        let sim = PathSimulator::new(42);
        let token = CancelToken::new();
        let a = sim
            .simulate(100.0, &model(0.001, 0.02), 30, 200, &token)
            .unwrap();
        let b = sim
            .simulate(100.0, &model(0.001, 0.02), 30, 200, &token)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_size_does_not_change_results() {
        // Per-path seeding makes the matrix independent of how paths are
        // partitioned across workers
        let token = CancelToken::new();
        let a = PathSimulator::new(7)
            .simulate(100.0, &model(0.0, 0.05), 10, 50, &token)
            .unwrap();
        let b = PathSimulator::new(7)
            .with_batch_size(3)
            .simulate(100.0, &model(0.0, 0.05), 10, 50, &token)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let token = CancelToken::new();
        let a = PathSimulator::new(1)
            .simulate(100.0, &model(0.0, 0.05), 5, 10, &token)
            .unwrap();
        let b = PathSimulator::new(2)
            .simulate(100.0, &model(0.0, 0.05), 5, 10, &token)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_volatility_compounds_deterministically() {
        let token = CancelToken::new();
        let matrix = PathSimulator::new(9)
            .simulate(100.0, &model(0.1, 0.0), 3, 5, &token)
            .unwrap();

        for path in 0..5 {
            let row = matrix.path(path);
            for (t, &price) in row.iter().enumerate() {
                let expected = 100.0 * 1.1_f64.powi(t as i32 + 1);
                assert_relative_eq!(price, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_negative_prices_are_not_clamped() {
        // mean -1.5 with zero volatility flips the sign each period
        let token = CancelToken::new();
        let matrix = PathSimulator::new(0)
            .simulate(100.0, &model(-1.5, 0.0), 2, 1, &token)
            .unwrap();
        let row = matrix.path(0);
        assert_relative_eq!(row[0], -50.0, epsilon = 1e-9);
        assert_relative_eq!(row[1], 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let token = CancelToken::new();
        assert!(matches!(
            PathSimulator::new(0).simulate(100.0, &model(0.0, 0.1), 0, 10, &token),
            Err(DashboardError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let token = CancelToken::new();
        assert!(matches!(
            PathSimulator::new(0).simulate(100.0, &model(0.0, 0.1), 10, 0, &token),
            Err(DashboardError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_malformed_model_rejected() {
        let token = CancelToken::new();
        assert!(PathSimulator::new(0)
            .simulate(100.0, &model(0.0, -0.1), 10, 10, &token)
            .is_err());
        assert!(PathSimulator::new(0)
            .simulate(100.0, &model(f64::NAN, 0.1), 10, 10, &token)
            .is_err());
    }

    #[test]
    fn test_cancelled_token_aborts() {
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(
            PathSimulator::new(0).simulate(100.0, &model(0.0, 0.1), 10, 10, &token),
            Err(DashboardError::Cancelled)
        ));
    }

    #[test]
    fn test_column_view_matches_rows() {
        let token = CancelToken::new();
        let matrix = PathSimulator::new(3)
            .simulate(100.0, &model(0.0, 0.05), 4, 6, &token)
            .unwrap();
        let col: Vec<f64> = matrix.column(2).collect();
        assert_eq!(col.len(), 6);
        for (path, &value) in col.iter().enumerate() {
            assert_eq!(value, matrix.path(path)[2]);
        }
    }
}
