use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{Schedule, SieveConfig};
use crate::segment::SegmentSieve;

/// What one worker did, returned from its thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerTally {
    pub worker_id: usize,
    /// Statically assigned range, `None` under the dynamic schedule
    pub range: Option<RangeInclusive<u64>>,
    pub segments: u64,
    pub primes: u64,
    pub elapsed: Duration,
}

/// Split `[2, bound]` into `workers` contiguous ranges.
///
/// Range `i` covers `[i * per, (i + 1) * per - 1]` with `per = bound / workers`,
/// the first range starts at 2 and the last one ends at `bound`. When `per`
/// is tiny some ranges come out empty; the non-empty ones still tile
/// `[2, bound]` exactly.
pub fn worker_ranges(bound: u64, workers: usize) -> Vec<RangeInclusive<u64>> {
    assert!(workers > 0, "at least one worker is required");

    let w = workers as u64;
    let per = bound / w;

    (0..w)
        .map(|i| {
            let start = (i * per).max(2);
            // One past the end, so an empty range never underflows
            let stop = if i == w - 1 { bound + 1 } else { (i + 1) * per };
            if start < stop {
                start..=stop - 1
            } else {
                // Canonical empty range
                2..=1
            }
        })
        .collect()
}

/// Number of `segment_size` windows needed to cover `[2, bound]`.
pub fn segment_count(bound: u64, segment_size: u64) -> u64 {
    if bound < 2 {
        0
    } else {
        (bound - 1).div_ceil(segment_size)
    }
}

/// Bits a worker's mask needs to sieve `span` integers in `segment_size` windows.
fn mask_width(span: u64, segment_size: usize) -> usize {
    span.min(segment_size as u64) as usize
}

/// Sieve `range` window by window, returning `(segments, primes)`.
fn sieve_range(
    range: &RangeInclusive<u64>,
    segment_size: u64,
    sieve: &mut SegmentSieve,
    base_primes: &[u64],
) -> (u64, u64) {
    if range.is_empty() {
        return (0, 0);
    }

    let end = *range.end();
    let mut low = *range.start();
    let mut segments = 0;
    let mut primes = 0;

    loop {
        let high = low.saturating_add(segment_size - 1).min(end);
        primes += sieve.count(low, high, base_primes);
        segments += 1;

        if high == end {
            break;
        }
        low = high + 1;
    }

    (segments, primes)
}

/// Run every worker to completion and return their tallies in worker order.
pub fn dispatch(config: &SieveConfig, base_primes: &[u64]) -> Vec<WorkerTally> {
    match config.schedule {
        Schedule::Static => dispatch_static(config, base_primes),
        Schedule::Dynamic => dispatch_dynamic(config, base_primes),
    }
}

fn dispatch_static(config: &SieveConfig, base_primes: &[u64]) -> Vec<WorkerTally> {
    let ranges = worker_ranges(config.bound, config.worker_count);
    let segment_size = config.segment_width();

    thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(worker_id, range)| {
                scope.spawn(move || {
                    let start = Instant::now();
                    let span = if range.is_empty() {
                        0
                    } else {
                        range.end() - range.start() + 1
                    };
                    let mut sieve =
                        SegmentSieve::new(mask_width(span, config.segment_size), config.wheel);
                    let (segments, primes) =
                        sieve_range(&range, segment_size, &mut sieve, base_primes);

                    WorkerTally {
                        worker_id,
                        range: Some(range),
                        segments,
                        primes,
                        elapsed: start.elapsed(),
                    }
                })
            })
            .collect();

        join_all(handles)
    })
}

/// Workers claim global segment indices from a shared cursor until none remain.
fn dispatch_dynamic(config: &SieveConfig, base_primes: &[u64]) -> Vec<WorkerTally> {
    let segment_size = config.segment_width();
    let total_segments = segment_count(config.bound, segment_size);
    let cursor = AtomicU64::new(0);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..config.worker_count)
            .map(|worker_id| {
                let cursor = &cursor;
                scope.spawn(move || {
                    let start = Instant::now();
                    let width = mask_width(config.bound.saturating_sub(1), config.segment_size);
                    let mut sieve = SegmentSieve::new(width, config.wheel);
                    let mut segments = 0;
                    let mut primes = 0;

                    loop {
                        let idx = cursor.fetch_add(1, Ordering::Relaxed);
                        if idx >= total_segments {
                            break;
                        }
                        let low = 2 + idx * segment_size;
                        let high = low.saturating_add(segment_size - 1).min(config.bound);
                        primes += sieve.count(low, high, base_primes);
                        segments += 1;
                    }

                    WorkerTally {
                        worker_id,
                        range: None,
                        segments,
                        primes,
                        elapsed: start.elapsed(),
                    }
                })
            })
            .collect();

        join_all(handles)
    })
}

fn join_all(handles: Vec<thread::ScopedJoinHandle<'_, WorkerTally>>) -> Vec<WorkerTally> {
    handles
        .into_iter()
        .map(|handle| {
            handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        })
        .collect()
}

/// Fold every worker's count into the total, once each.
pub fn aggregate(tallies: &[WorkerTally]) -> u64 {
    tallies.iter().map(|t| t.primes).sum()
}
