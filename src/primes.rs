/// Integer square root: the largest `r` with `r * r <= x`.
///
/// Digit-by-digit extraction in base 4, no floating point. Float sqrt loses
/// precision close to perfect squares once `x` passes 2^53, which is enough
/// to shift the base sieve limit by one.
/// - Time complexity: O(log x)
#[inline]
pub fn isqrt(x: u64) -> u64 {
    let mut rem = x;
    let mut res = 0_u64;
    let mut bit = 1_u64 << 62;

    while bit > rem {
        bit >>= 2;
    }

    while bit != 0 {
        if rem >= res + bit {
            rem -= res + bit;
            res = (res >> 1) + bit;
        } else {
            res >>= 1;
        }
        bit >>= 2;
    }

    res
}

/// Basic Sieve of Eratosthenes over a `Vec<bool>`
///
/// Produces the base primes for segmented sieving, so `max` is at most
/// `isqrt(bound)` and the array stays small.
/// - Time complexity: O(n log log n)
/// - Space complexity: O(n) - 1 byte per number
pub fn simple_sieve(max: u64) -> Vec<u64> {
    if max < 2 {
        return vec![];
    }

    let limit = max as usize;
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut i = 2;
    while i * i <= limit {
        if is_prime[i] {
            let mut j = i * i;
            while j <= limit {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }

    is_prime
        .iter()
        .enumerate()
        .filter_map(|(num, &prime)| if prime { Some(num as u64) } else { None })
        .collect()
}

/// Cheap rejection of multiples of 2, 3 and 5.
///
/// Values up to 7 are answered exactly, so the small primes themselves pass.
#[inline]
pub fn passes_wheel30(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n <= 7 {
        return n == 2 || n == 3 || n == 5 || n == 7;
    }
    n % 2 != 0 && n % 3 != 0 && n % 5 != 0
}
