//! Pythagorean triples `a² + b² = c²` generated by Euclid's formula
//!
//! For coprime `m > n > 0` of opposite parity, `(m² - n², 2mn, m² + n²)`
//! is a primitive triple, and every primitive triple is obtained this way exactly once.

use num_integer::Integer;
use std::fmt;

/// A pythagorean triple with `a < b < c`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PythagoreanTriple {
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

impl PythagoreanTriple {
    /// Create the triple from Euclid's parameters, legs are sorted so that `a < b`.
    ///
    /// # Panics
    /// If `m > n > 0` doesn't hold, or if `m² + n²` doesn't fit in a `u64`.
    pub fn from_euclid(m: u64, n: u64) -> Self {
        assert!(m > n && n > 0, "euclid's formula requires m > n > 0");
        let sides = m.checked_mul(m).zip(n.checked_mul(n)).and_then(|(mm, nn)| {
            Some((mm - nn, m.checked_mul(n)?.checked_mul(2)?, mm.checked_add(nn)?))
        });
        let (x, y, c) = match sides {
            Some(s) => s,
            None => panic!("triple from m = {}, n = {} overflows u64", m, n),
        };
        PythagoreanTriple {
            a: x.min(y),
            b: x.max(y),
            c,
        }
    }

    #[inline]
    pub fn perimeter(&self) -> u64 {
        self.a + self.b + self.c
    }

    /// Check if gcd(a, b, c) = 1
    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.a.gcd(&self.b) == 1
    }

    /// Multiply all sides by `k`
    #[inline]
    pub fn scale(&self, k: u64) -> Self {
        PythagoreanTriple {
            a: self.a * k,
            b: self.b * k,
            c: self.c * k,
        }
    }

    fn sort_key(&self) -> (u64, u64) {
        (self.perimeter(), self.a)
    }
}

impl fmt::Display for PythagoreanTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.a, self.b, self.c)
    }
}

// perimeter 2m(m + n) of the triple from Euclid's parameters, None on overflow
fn euclid_perimeter(m: u64, n: u64) -> Option<u64> {
    m.checked_add(n)?.checked_mul(m)?.checked_mul(2)
}

/// All primitive triples with perimeter not exceeding `max_perimeter`,
/// ordered by perimeter and then by the shortest leg.
pub fn primitive_triples(max_perimeter: u64) -> Vec<PythagoreanTriple> {
    let mut result = Vec::new();

    // perimeter = 2m(m + n) > 2m², so m is bounded by sqrt(max_perimeter / 2)
    let within = |m, n| euclid_perimeter(m, n).map_or(false, |p| p <= max_perimeter);
    let mut m = 2u64;
    while within(m, 1) {
        let mut n = if m.is_odd() { 2 } else { 1 };
        while n < m && within(m, n) {
            if m.gcd(&n) == 1 {
                result.push(PythagoreanTriple::from_euclid(m, n));
            }
            n += 2;
        }
        m += 1;
    }

    result.sort_by_key(PythagoreanTriple::sort_key);
    result
}

/// All triples (primitive or not) with perimeter not exceeding `max_perimeter`,
/// ordered by perimeter and then by the shortest leg.
pub fn triples(max_perimeter: u64) -> Vec<PythagoreanTriple> {
    let mut result = Vec::new();
    for t in primitive_triples(max_perimeter) {
        let p = t.perimeter();
        result.extend((1..=max_perimeter / p).map(|k| t.scale(k)));
    }

    result.sort_by_key(PythagoreanTriple::sort_key);
    result
}
