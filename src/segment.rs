use crate::primes::passes_wheel30;

/// Bit-packed candidate mask for one sieving window.
///
/// Bit `i` stands for `low + i`; a set bit means "not yet proven composite".
pub struct SegmentMask {
    bits: Vec<u64>,
    len: usize,
}

impl SegmentMask {
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: vec![!0_u64; capacity.div_ceil(64)],
            len: capacity,
        }
    }

    /// Number of bits the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.bits.len() * 64
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Mark the first `len` bits as candidates. Reuses the allocation.
    pub fn reset(&mut self, len: usize) {
        debug_assert!(len <= self.capacity());
        let words = len.div_ceil(64);
        self.bits[..words].fill(!0_u64);
        self.len = len;
    }

    #[cfg(test)]
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.bits[idx / 64] |= 1_u64 << (idx % 64);
    }

    #[inline]
    pub fn clear(&mut self, idx: usize) {
        self.bits[idx / 64] &= !(1_u64 << (idx % 64));
    }

    #[inline]
    pub fn test(&self, idx: usize) -> bool {
        (self.bits[idx / 64] & (1_u64 << (idx % 64))) != 0
    }

    /// Count set bits among the first `len` positions.
    pub fn count_ones(&self) -> u64 {
        let full = self.len / 64;
        let mut count: u64 = self.bits[..full]
            .iter()
            .map(|w| w.count_ones() as u64)
            .sum();

        let tail = self.len % 64;
        if tail != 0 {
            let mask = (1_u64 << tail) - 1;
            count += (self.bits[full] & mask).count_ones() as u64;
        }
        count
    }
}

/// Per-worker segmented sieve. Owns one mask that is reused for every window.
pub struct SegmentSieve {
    mask: SegmentMask,
    wheel: bool,
}

impl SegmentSieve {
    pub fn new(segment_size: usize, wheel: bool) -> Self {
        Self {
            mask: SegmentMask::new(segment_size),
            wheel,
        }
    }

    /// Count the primes in `[low, high]`.
    ///
    /// `base_primes` must hold every prime up to `isqrt(high)` in ascending
    /// order. The window must be no wider than the mask. 0 and 1 are never
    /// counted.
    pub fn count(&mut self, low: u64, high: u64, base_primes: &[u64]) -> u64 {
        let low = low.max(2);
        if high < low {
            return 0;
        }

        let width = (high - low + 1) as usize;
        assert!(
            width <= self.mask.capacity(),
            "window of {} exceeds segment size {}",
            width,
            self.mask.capacity()
        );

        self.mask.reset(width);

        for &p in base_primes {
            let square = p * p;
            if square > high {
                break;
            }

            // First multiple of p that is >= low, but never p itself
            let mut j = square.max(low.div_ceil(p) * p);
            while j <= high {
                self.mask.clear((j - low) as usize);
                j += p;
            }
        }

        if self.wheel {
            (0..self.mask.len())
                .filter(|&idx| self.mask.test(idx) && passes_wheel30(low + idx as u64))
                .count() as u64
        } else {
            self.mask.count_ones()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::{isqrt, simple_sieve};

    fn brute_count(low: u64, high: u64) -> u64 {
        (low..=high)
            .filter(|&n| n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0))
            .count() as u64
    }

    #[test]
    fn test_mask_bit_operations() {
        let mut mask = SegmentMask::new(130);
        assert_eq!(mask.len(), 130);
        assert_eq!(mask.capacity(), 192);
        assert_eq!(mask.count_ones(), 130);

        mask.clear(0);
        mask.clear(64);
        mask.clear(129);
        assert!(!mask.test(0));
        assert!(mask.test(1));
        assert!(!mask.test(64));
        assert!(!mask.test(129));
        assert_eq!(mask.count_ones(), 127);

        mask.set(64);
        assert!(mask.test(64));
        assert_eq!(mask.count_ones(), 128);

        mask.reset(70);
        assert_eq!(mask.len(), 70);
        assert!(mask.test(0));
        assert_eq!(mask.count_ones(), 70);
    }

    #[test]
    fn test_count_first_hundred() {
        let base = simple_sieve(10);
        let mut sieve = SegmentSieve::new(1_000, false);
        assert_eq!(sieve.count(2, 100, &base), 25);
    }

    #[test]
    fn test_two_and_three_survive() {
        let base = simple_sieve(isqrt(1_000));
        let mut sieve = SegmentSieve::new(16, false);
        assert_eq!(sieve.count(2, 2, &base), 1);
        assert_eq!(sieve.count(2, 3, &base), 2);
        assert_eq!(sieve.count(3, 3, &base), 1);
        assert_eq!(sieve.count(2, 4, &base), 2);
    }

    #[test]
    fn test_windows_match_brute_force() {
        let base = simple_sieve(isqrt(10_000));
        for wheel in [false, true] {
            let mut sieve = SegmentSieve::new(97, wheel);
            let mut low = 2;
            while low <= 10_000 {
                let high = (low + 96).min(10_000);
                assert_eq!(
                    sieve.count(low, high, &base),
                    brute_count(low, high),
                    "window [{}, {}] wheel={}",
                    low,
                    high,
                    wheel
                );
                low = high + 1;
            }
        }
    }

    #[test]
    fn test_wheel_filter_does_not_change_count() {
        let bound = 1_000_000_u64;
        let base = simple_sieve(isqrt(bound + 10_000));
        let mut plain = SegmentSieve::new(10_000, false);
        let mut wheeled = SegmentSieve::new(10_000, true);
        assert_eq!(
            plain.count(bound, bound + 9_999, &base),
            wheeled.count(bound, bound + 9_999, &base)
        );
        assert_eq!(plain.count(2, 10_001, &base), 1_229);
        assert_eq!(wheeled.count(2, 10_001, &base), 1_229);
    }

    #[test]
    fn test_window_below_trillion_matches_miller_rabin() {
        use rug::Integer;
        use rug::integer::IsPrime;

        let high = 1_000_000_000_000_u64;
        let low = high - 20_000;
        let base = simple_sieve(isqrt(high));

        let expected = (low..=high)
            .filter(|&n| Integer::from(n).is_probably_prime(30) != IsPrime::No)
            .count() as u64;

        for wheel in [false, true] {
            let mut sieve = SegmentSieve::new(20_001, wheel);
            assert_eq!(sieve.count(low, high, &base), expected, "wheel={}", wheel);
        }
    }

    #[test]
    fn test_zero_and_one_are_not_counted() {
        let base = simple_sieve(10);
        for wheel in [false, true] {
            let mut sieve = SegmentSieve::new(100, wheel);
            assert_eq!(sieve.count(0, 10, &base), 4, "wheel={}", wheel);
            assert_eq!(sieve.count(1, 1, &base), 0, "wheel={}", wheel);
            assert_eq!(sieve.count(0, 1, &base), 0, "wheel={}", wheel);
            assert_eq!(sieve.count(1, 3, &base), 2, "wheel={}", wheel);
        }
    }

    #[test]
    fn test_empty_window() {
        let mut sieve = SegmentSieve::new(8, false);
        assert_eq!(sieve.count(10, 9, &[2, 3]), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds segment size")]
    fn test_window_wider_than_mask_panics() {
        let mut sieve = SegmentSieve::new(64, false);
        sieve.count(2, 1_000, &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31]);
    }
}
