use crate::error::{Error, Result};

/// Upper limit of the default run.
pub const DEFAULT_BOUND: u64 = 1_000_000_000_000;
/// Integers per segment. Sized so the mask (~305KB) stays in L2/L3.
pub const DEFAULT_SEGMENT_SIZE: usize = 2_500_000;
pub const DEFAULT_WORKERS: usize = 32;
/// π(10^12)
pub const DEFAULT_REFERENCE_COUNT: u64 = 37_607_912_018;

/// Largest accepted bound.
///
/// Below 2^62 every p² for a base prime, the ceiling division `low + p - 1`
/// and a step of `p` past `high` all stay inside u64.
pub const MAX_BOUND: u64 = 1 << 62;

/// Largest accepted segment size: a 256MB mask per worker.
pub const MAX_SEGMENT_SIZE: usize = 1 << 31;
pub const MAX_WORKERS: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Schedule {
    /// One contiguous range per worker, fixed up front
    Static,
    /// Workers pull segments from a shared cursor until the range is exhausted
    Dynamic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SieveConfig {
    pub bound: u64,
    pub segment_size: usize,
    pub worker_count: usize,
    pub reference_count: Option<u64>,
    pub schedule: Schedule,
    pub wheel: bool,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            segment_size: DEFAULT_SEGMENT_SIZE,
            worker_count: DEFAULT_WORKERS,
            reference_count: Some(DEFAULT_REFERENCE_COUNT),
            schedule: Schedule::Static,
            wheel: false,
        }
    }
}

impl SieveConfig {
    pub fn new(bound: u64, segment_size: usize, worker_count: usize) -> Self {
        Self {
            bound,
            segment_size,
            worker_count,
            reference_count: None,
            schedule: Schedule::Static,
            wheel: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(Error::ZeroWorkers);
        }
        if self.worker_count > MAX_WORKERS {
            return Err(Error::TooManyWorkers {
                workers: self.worker_count,
                max: MAX_WORKERS,
            });
        }
        if self.segment_size == 0 {
            return Err(Error::ZeroSegmentSize);
        }
        if self.segment_size > MAX_SEGMENT_SIZE {
            return Err(Error::SegmentSizeTooLarge {
                size: self.segment_size,
                max: MAX_SEGMENT_SIZE,
            });
        }
        if self.bound > MAX_BOUND {
            return Err(Error::BoundTooLarge {
                bound: self.bound,
                max: MAX_BOUND,
            });
        }
        Ok(())
    }

    /// Width of the sieving window as a u64, for range arithmetic.
    pub fn segment_width(&self) -> u64 {
        self.segment_size as u64
    }
}
