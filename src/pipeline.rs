use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::config::SieveConfig;
use crate::error::Result;
use crate::partition::{self, WorkerTally};
use crate::primes::{isqrt, simple_sieve};

/// Outcome of one complete counting run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub config: SieveConfig,
    pub started_at: DateTime<Local>,
    /// Largest value the base primes cover
    pub sqrt_limit: u64,
    pub base_prime_count: usize,
    pub total: u64,
    pub tallies: Vec<WorkerTally>,
    /// Wall time of the parallel phase, base sieve excluded
    pub elapsed: Duration,
}

impl RunSummary {
    /// Integers in `[2, bound]`.
    pub fn candidates(&self) -> u64 {
        self.config.bound.saturating_sub(1)
    }

    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.candidates() as f64 / secs
        } else {
            0.0
        }
    }

    /// `(accuracy percent, absolute difference)` against the reference count.
    pub fn accuracy(&self) -> Option<(f64, u64)> {
        let reference = self.config.reference_count?;
        let percent = if reference == 0 {
            if self.total == 0 { 100.0 } else { 0.0 }
        } else {
            self.total as f64 * 100.0 / reference as f64
        };
        Some((percent, self.total.abs_diff(reference)))
    }
}

/// Count the primes in `[2, config.bound]`.
///
/// The base primes are computed before any worker starts and are only read
/// afterwards. Each worker hands back its own tally and the total is summed
/// once every worker has been joined.
pub fn count_primes(config: &SieveConfig) -> Result<RunSummary> {
    config.validate()?;

    let started_at = Local::now();
    let sqrt_limit = isqrt(config.bound);
    let base_primes = simple_sieve(sqrt_limit);

    let start = Instant::now();
    let tallies = partition::dispatch(config, &base_primes);
    let total = partition::aggregate(&tallies);
    let elapsed = start.elapsed();

    Ok(RunSummary {
        config: config.clone(),
        started_at,
        sqrt_limit,
        base_prime_count: base_primes.len(),
        total,
        tallies,
        elapsed,
    })
}
