/// π(10^k) for k = 0..=12.
const POWERS_OF_TEN: [u64; 13] = [
    0,
    4,
    25,
    168,
    1_229,
    9_592,
    78_498,
    664_579,
    5_761_455,
    50_847_534,
    455_052_511,
    4_118_054_813,
    37_607_912_018,
];

/// Known prime count for `bound`, if `bound` is a tabulated power of ten.
pub fn known_count(bound: u64) -> Option<u64> {
    let mut power = 1_u64;
    for &count in &POWERS_OF_TEN {
        if power == bound {
            return Some(count);
        }
        power *= 10;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::simple_sieve;

    #[test]
    fn test_known_count() {
        assert_eq!(known_count(1), Some(0));
        assert_eq!(known_count(100), Some(25));
        assert_eq!(known_count(1_000_000_000_000), Some(37_607_912_018));
        assert_eq!(known_count(0), None);
        assert_eq!(known_count(99), None);
        assert_eq!(known_count(10_000_000_000_000), None);
    }

    #[test]
    fn test_table_agrees_with_sieve() {
        for k in 0..=6 {
            let bound = 10_u64.pow(k);
            assert_eq!(
                known_count(bound),
                Some(simple_sieve(bound).len() as u64),
                "10^{}",
                k
            );
        }
    }
}
