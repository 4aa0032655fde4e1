//! Primality test and prime listing for machine integers

use num_integer::Roots;

#[inline]
fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    (a as u128 * b as u128 % m as u128) as u64
}

fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1u64;
    let mut base = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

// these witnesses are enough for all n < 3.3e24
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Deterministic Miller-Rabin test, exact for every `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in WITNESSES.iter() {
        if n % p == 0 {
            return n == p;
        }
    }

    // write n-1 = 2^s * d
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for &a in WITNESSES.iter() {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// List all primes below `limit` in ascending order, using the sieve of Eratosthenes
pub fn primes_below(limit: u64) -> Vec<u64> {
    if limit < 3 {
        return Vec::new();
    }

    let size = limit as usize;
    let mut sieve = vec![true; size];
    sieve[0] = false;
    sieve[1] = false;
    for i in 2..=(limit - 1).sqrt() as usize {
        if sieve[i] {
            for j in (i * i..size).step_by(i) {
                sieve[j] = false;
            }
        }
    }

    sieve
        .iter()
        .enumerate()
        .filter(|&(_, &prime)| prime)
        .map(|(i, _)| i as u64)
        .collect()
}

/// Unbounded iterator of primes in ascending order, starting from 2.
/// The iterator stops after the largest prime below `u64::MAX`.
#[derive(Debug, Clone)]
pub struct PrimeIter {
    next: Option<u64>,
}

impl PrimeIter {
    pub fn new() -> Self {
        PrimeIter { next: Some(2) }
    }

    /// Start from the first prime not less than `start`
    pub fn starting_at(start: u64) -> Self {
        PrimeIter { next: Some(start) }
    }
}

impl Default for PrimeIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for PrimeIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let mut candidate = self.next?;
        while !is_prime(candidate) {
            candidate = candidate.checked_add(1)?;
        }
        self.next = candidate.checked_add(1);
        Some(candidate)
    }
}
