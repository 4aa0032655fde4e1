//! Periodic continued fraction of square roots

use super::block::Block;
use crate::error::{ExpansionError, PartsError};
use crate::traits::Computable;
use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_rational::Ratio;
use num_traits::{NumRef, One, RefNum, ToPrimitive, Zero};
use std::fmt;
use tracing::{debug, error};

/// A helper trait to define valid type that can be used for [SqrtExpansion]
pub trait ExpansionBase:
    Integer + NumRef + Clone + Roots + ToPrimitive + Into<BigInt> + fmt::Display
{
}
impl<T: Integer + NumRef + Clone + Roots + ToPrimitive + Into<BigInt> + fmt::Display>
    ExpansionBase for T
{
}

/// Continued fraction expansion of the square root of a non-square integer,
/// `√n = [a0; (a1, a2, ..., ak)]`. The expansion of a quadratic irrational
/// like this is purely periodic after the first term.
///
/// ```
/// use num_euler::SqrtExpansion;
/// use num_rational::Ratio;
/// use num_bigint::BigInt;
///
/// let expansion = SqrtExpansion::new(24u64).unwrap();
/// assert_eq!(expansion.root(), &4);
/// assert_eq!(expansion.periodic_coeffs(), &[1, 8]);
/// assert_eq!(expansion.nth_fraction(3), Ratio::new(BigInt::from(44), BigInt::from(9)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawParts<T>",
        bound(deserialize = "T: serde::Deserialize<'de> + Zero + PartialOrd")
    )
)]
pub struct SqrtExpansion<T = u64> {
    /// Integer part of the square root
    root: T,

    /// Repeating block of coefficients, never empty and all positive
    period: Vec<T>,
}

impl<T: Zero + PartialOrd> SqrtExpansion<T> {
    /// Rebuild an expansion from a known integer part and period.
    ///
    /// The period must be non-empty with positive coefficients, otherwise
    /// [PartsError] is returned. Beyond that the parts are trusted, they are
    /// not checked to be the expansion of an actual square root.
    pub fn try_from_parts(root: T, period: Vec<T>) -> Result<Self, PartsError> {
        if period.is_empty() {
            return Err(PartsError::EmptyPeriod);
        }
        if let Some(index) = period.iter().position(|a| a <= &T::zero()) {
            return Err(PartsError::NonPositive { index });
        }
        Ok(SqrtExpansion { root, period })
    }

    /// Same as [SqrtExpansion::try_from_parts], but panics on invalid parts.
    pub fn from_parts(root: T, period: Vec<T>) -> Self {
        match Self::try_from_parts(root, period) {
            Ok(v) => v,
            Err(e) => panic!("invalid expansion parts: {}", e),
        }
    }
}

// deserialized parts go through `try_from_parts` before becoming an expansion
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename = "SqrtExpansion")]
struct RawParts<T> {
    root: T,
    period: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Zero + PartialOrd> std::convert::TryFrom<RawParts<T>> for SqrtExpansion<T> {
    type Error = PartsError;

    fn try_from(raw: RawParts<T>) -> Result<Self, PartsError> {
        Self::try_from_parts(raw.root, raw.period)
    }
}

impl<T> SqrtExpansion<T> {
    /// Integer part of the square root, i.e. `floor(√n)`
    #[inline]
    pub fn root(&self) -> &T {
        &self.root
    }

    /// Coefficients of the repeating block
    #[inline]
    pub fn periodic_coeffs(&self) -> &[T] {
        &self.period[..]
    }

    /// Length of the repeating block
    #[inline]
    pub fn period(&self) -> usize {
        self.period.len()
    }

    /// Get the i-th coefficient after the integer part. The index wraps around
    /// the period, so it's valid for any `i`.
    #[inline]
    pub fn coefficient(&self, i: usize) -> &T {
        &self.period[i % self.period.len()]
    }

    /// Returns an iterator of all coefficients, starting from the integer part.
    /// The iterator never ends.
    pub fn coeffs(&self) -> Coefficients<T> {
        Coefficients {
            root: Some(&self.root),
            period: &self.period,
            pos: 0,
        }
    }

    /// Decompose the expansion into the integer part and the period
    pub fn into_parts(self) -> (T, Vec<T>) {
        (self.root, self.period)
    }
}

// upper bound for the length of the period, well above the 0.72·√n·ln(n) estimate
fn step_guard<T: ToPrimitive>(root: &T) -> usize {
    match root.to_usize() {
        Some(r) => {
            let bits = (usize::BITS - r.leading_zeros()) as usize;
            r.saturating_mul(2).saturating_mul(bits + 2)
        }
        None => usize::MAX,
    }
}

// REF: https://en.wikipedia.org/wiki/Methods_of_computing_square_roots#Continued_fraction_expansion
fn derive<T: ExpansionBase>(n: &T) -> Result<(T, Vec<T>), ExpansionError<T>>
where
    for<'r> &'r T: RefNum<T>,
{
    if n < &T::zero() {
        return Err(ExpansionError::Negative(n.clone()));
    }

    let root = n.sqrt();
    if &root * &root == *n {
        return Err(ExpansionError::Square(n.clone()));
    }

    // the state (epsilon, gamma) represents the complete quotient (√n + epsilon) / gamma
    let (epsilon0, gamma0) = (root.clone(), n - &root * &root);
    let (mut epsilon, mut gamma) = (epsilon0.clone(), gamma0.clone());
    let guard = step_guard(&root);

    let mut period = Vec::new();
    loop {
        let a = (&root + &epsilon) / &gamma;
        epsilon = &a * &gamma - &epsilon;
        gamma = (n - &epsilon * &epsilon) / &gamma; // exact division
        period.push(a);

        if epsilon == epsilon0 && gamma == gamma0 {
            break;
        }
        if period.len() >= guard {
            error!(n = %n, steps = period.len(), "square root expansion didn't repeat");
            return Err(ExpansionError::PeriodNotFound {
                steps: period.len(),
            });
        }
    }

    debug!(n = %n, root = %root, period = period.len(), "derived square root expansion");
    Ok((root, period))
}

impl<T: ExpansionBase> SqrtExpansion<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// Compute the expansion of `√n`. Fails if `n` is a perfect square
    /// (including 0 and 1) or negative.
    pub fn new(n: T) -> Result<Self, ExpansionError<T>> {
        let (root, period) = derive(&n)?;
        Ok(SqrtExpansion { root, period })
    }

    /// Returns an iterator of the convergents `p_k / q_k`, starting from `a0 / 1`.
    /// The iterator never ends, and the values are exact.
    pub fn convergents(&self) -> Convergents<T> {
        Convergents {
            coeffs: self.coeffs(),
            block: Block::identity(),
        }
    }

    /// Rational estimate of `√n` using the first `k` coefficients
    /// (the integer part included), i.e. `[a0; a1, ..., a_(k-1)]`.
    /// `k = 0` gives the same result as `k = 1`.
    pub fn nth_fraction(&self, k: usize) -> Ratio<BigInt> {
        let (mut numer, mut denom) = (BigInt::zero(), BigInt::one());
        for i in (0..k.saturating_sub(1)).rev() {
            let c: BigInt = self.coefficient(i).clone().into();
            let next = &numer + &denom * c;
            numer = std::mem::replace(&mut denom, next);
        }

        let root: BigInt = self.root.clone().into();
        Ratio::from_integer(root) + Ratio::new(numer, denom)
    }

    /// Recover `n` from the expansion.
    ///
    /// It uses the identity `p² - n·q² = (-1)^L` where `p/q` is the convergent
    /// at the end of the first period of length `L`. For a reconstructed
    /// expansion that doesn't come from a real square root, the result is meaningless.
    pub fn radicand(&self) -> BigInt {
        let (p, q) = self.nth_convergent(self.period() - 1);
        let sign = if self.period().is_even() {
            BigInt::one()
        } else {
            -BigInt::one()
        };
        (&p * &p - sign) / (&q * &q)
    }

    /// Fundamental solution `(x, y)` of the Pell equation `x² - n·y² = 1`
    pub fn pell_solution(&self) -> (BigInt, BigInt) {
        let len = self.period();
        let index = if len.is_even() { len - 1 } else { 2 * len - 1 };
        let (x, y) = self.nth_convergent(index);
        debug!(x = %x, y = %y, "solved pell equation");
        (x, y)
    }

    fn nth_convergent(&self, index: usize) -> (BigInt, BigInt) {
        match self.convergents().nth(index) {
            Some(r) => r.into(),
            None => unreachable!("convergents of a square root never end"),
        }
    }
}

impl<T: ExpansionBase> Computable<BigInt> for SqrtExpansion<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// The last convergent whose denominator doesn't exceed `limit`.
    fn approximated(&self, limit: &BigInt) -> Ratio<BigInt> {
        let root: BigInt = self.root.clone().into();
        let mut best = Ratio::from_integer(root);
        for conv in self.convergents() {
            if conv.denom() > limit {
                break;
            }
            best = conv;
        }
        best
    }
}

/// Iterator of coefficients in a [SqrtExpansion]
#[derive(Debug, Clone)]
pub struct Coefficients<'a, T> {
    root: Option<&'a T>, // None after the integer part is consumed
    period: &'a [T],
    pos: usize,
}

impl<'a, T> Iterator for Coefficients<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return Some(root);
        }

        let v = &self.period[self.pos];
        self.pos = (self.pos + 1) % self.period.len();
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Iterator of convergents of a [SqrtExpansion]
#[derive(Debug, Clone)]
pub struct Convergents<'a, T> {
    coeffs: Coefficients<'a, T>,
    block: Block<BigInt>,
}

impl<'a, T: Clone + Into<BigInt>> Iterator for Convergents<'a, T> {
    type Item = Ratio<BigInt>;

    fn next(&mut self) -> Option<Self::Item> {
        let a: BigInt = self.coeffs.next()?.clone().into();
        Some(self.block.push(&a))
    }
}

impl<T: fmt::Display> fmt::Display for SqrtExpansion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}; (", self.root)?;
        let mut piter = self.period.iter();
        if let Some(v) = piter.next() {
            write!(f, "{}", v)?;
        }
        for v in piter {
            write!(f, ", {}", v)?;
        }
        write!(f, ")]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use num_traits::Signed;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ratio(p: i64, q: i64) -> Ratio<BigInt> {
        Ratio::new(BigInt::from(p), BigInt::from(q))
    }

    #[test]
    fn creation_test() {
        let cf = SqrtExpansion::new(24u64).unwrap();
        assert_eq!(cf.root(), &4);
        assert_eq!(cf.periodic_coeffs(), &[1, 8]);
        assert_eq!(cf.period(), 2);

        assert_eq!(cf, SqrtExpansion::from_parts(4, vec![1, 8]));
        assert_eq!(cf.clone().into_parts(), (4, vec![1, 8]));
    }

    #[test]
    fn known_expansions_test() {
        let cases: &[(u64, u64, &[u64])] = &[
            (2, 1, &[2]),
            (3, 1, &[1, 2]),
            (5, 2, &[4]),
            (7, 2, &[1, 1, 1, 4]),
            (13, 3, &[1, 1, 1, 1, 6]),
            (23, 4, &[1, 3, 1, 8]),
            (24, 4, &[1, 8]),
            (61, 7, &[1, 4, 3, 1, 2, 2, 1, 3, 4, 1, 14]),
        ];
        for &(n, root, period) in cases {
            let cf = SqrtExpansion::new(n).unwrap();
            assert_eq!(cf.root(), &root, "root of {}", n);
            assert_eq!(cf.periodic_coeffs(), period, "period of {}", n);
        }
    }

    #[test]
    fn square_rejection_test() {
        assert_eq!(SqrtExpansion::new(25u64), Err(ExpansionError::Square(25)));
        assert_eq!(SqrtExpansion::new(0u32), Err(ExpansionError::Square(0)));
        assert_eq!(SqrtExpansion::new(1u32), Err(ExpansionError::Square(1)));
        assert_eq!(SqrtExpansion::new(-3i64), Err(ExpansionError::Negative(-3)));
        for i in 2u64..100 {
            assert!(matches!(
                SqrtExpansion::new(i * i),
                Err(ExpansionError::Square(_))
            ));
        }

        let err = SqrtExpansion::new(25u64).unwrap_err();
        assert_eq!(err.to_string(), "value cannot be a square: 25");
    }

    #[test]
    #[should_panic]
    fn empty_period_test() {
        SqrtExpansion::from_parts(4u64, vec![]);
    }

    #[test]
    #[should_panic]
    fn zero_coefficient_test() {
        SqrtExpansion::from_parts(4u64, vec![0]);
    }

    #[test]
    fn try_from_parts_test() {
        assert_eq!(
            SqrtExpansion::try_from_parts(4u64, vec![1, 8]),
            Ok(SqrtExpansion::new(24u64).unwrap())
        );
        assert_eq!(
            SqrtExpansion::try_from_parts(4u64, vec![]),
            Err(PartsError::EmptyPeriod)
        );
        assert_eq!(
            SqrtExpansion::try_from_parts(4u64, vec![1, 0]),
            Err(PartsError::NonPositive { index: 1 })
        );
        assert_eq!(
            SqrtExpansion::try_from_parts(2i64, vec![-1, 4]),
            Err(PartsError::NonPositive { index: 0 })
        );
        assert_eq!(
            PartsError::NonPositive { index: 1 }.to_string(),
            "periodic coefficient at 1 must be positive"
        );
    }

    #[test]
    fn coefficient_test() {
        let cf = SqrtExpansion::new(24u64).unwrap();
        assert_eq!(cf.coefficient(0), &1);
        assert_eq!(cf.coefficient(3), &8);
        assert_eq!(cf.coefficient(4), &1);
        assert_eq!(
            cf.coeffs().take(6).cloned().collect::<Vec<_>>(),
            vec![4, 1, 8, 1, 8, 1]
        );
    }

    #[test]
    fn nth_fraction_test() {
        let cf = SqrtExpansion::new(24u64).unwrap();
        assert_eq!(cf.nth_fraction(1), ratio(4, 1));
        assert_eq!(cf.nth_fraction(2), ratio(5, 1));
        assert_eq!(cf.nth_fraction(3), ratio(44, 9));
        assert_eq!(cf.nth_fraction(4), ratio(49, 10));
        assert_eq!(cf.nth_fraction(0), ratio(4, 1));

        // repeated queries give the same value
        assert_eq!(cf.nth_fraction(4), cf.nth_fraction(4));
    }

    #[test]
    fn convergents_test() {
        let sq2 = SqrtExpansion::new(2u32).unwrap();
        assert_eq!(
            sq2.convergents().take(5).collect::<Vec<_>>(),
            vec![ratio(1, 1), ratio(3, 2), ratio(7, 5), ratio(17, 12), ratio(41, 29)]
        );

        let cf = SqrtExpansion::new(61u64).unwrap();
        for (k, conv) in cf.convergents().take(30).enumerate() {
            assert_eq!(conv, cf.nth_fraction(k + 1));
        }
    }

    #[test]
    fn approximated_test() {
        let sq2 = SqrtExpansion::new(2u64).unwrap();
        assert_eq!(sq2.approximated(&BigInt::from(10)), ratio(7, 5));

        let cf = SqrtExpansion::new(24u64).unwrap();
        assert_eq!(cf.approximated(&BigInt::from(10)), ratio(49, 10));
        assert_eq!(cf.approximated(&BigInt::from(100)), ratio(485, 99));
        assert_eq!(cf.approximated(&BigInt::zero()), ratio(4, 1));
    }

    #[test]
    fn pell_test() {
        let cases: &[(u64, i64, i64)] = &[
            (2, 3, 2),
            (3, 2, 1),
            (13, 649, 180),
            (24, 5, 1),
            (61, 1766319049, 226153980),
        ];
        for &(n, x, y) in cases {
            let cf = SqrtExpansion::new(n).unwrap();
            assert_eq!(cf.pell_solution(), (BigInt::from(x), BigInt::from(y)));
        }
    }

    #[test]
    fn radicand_test() {
        for n in [2u64, 3, 7, 13, 24, 61, 94, 991] {
            let cf = SqrtExpansion::new(n).unwrap();
            assert_eq!(cf.radicand(), BigInt::from(n));
        }
    }

    #[test]
    fn big_integer_test() {
        // n = r^2 + 1 has expansion [r; (2r)]
        let r = BigUint::from(10u32).pow(20);
        let n = &r * &r + BigUint::one();
        let cf = SqrtExpansion::new(n.clone()).unwrap();
        assert_eq!(cf.root(), &r);
        assert_eq!(cf.periodic_coeffs(), &[&r * 2u32]);
        assert_eq!(cf.radicand(), BigInt::from(n));

        let square = &r * &r;
        assert!(matches!(
            SqrtExpansion::new(square),
            Err(ExpansionError::Square(_))
        ));

        let cf = SqrtExpansion::new(u128::MAX).unwrap();
        assert_eq!(cf.root(), &(u64::MAX as u128));
    }

    #[test]
    fn random_properties_test() {
        let mut rng = StdRng::seed_from_u64(2021);
        for _ in 0..200 {
            let n: u64 = rng.gen_range(2..1_000_000);
            let cf = match SqrtExpansion::new(n) {
                Ok(cf) => cf,
                Err(e) => {
                    assert_eq!(e, ExpansionError::Square(n));
                    continue;
                }
            };

            let root = *cf.root();
            assert!(root * root < n && n < (root + 1) * (root + 1));

            // the period ends with 2·a0
            let len = cf.period();
            assert!(len > 0);
            assert_eq!(cf.coefficient(len - 1), &(2 * root));
            for i in 0..3 * len {
                assert_eq!(cf.coefficient(i), cf.coefficient(i + len));
            }

            assert_eq!(cf.radicand(), BigInt::from(n));
            let (x, y) = cf.pell_solution();
            assert_eq!(&x * &x - BigInt::from(n) * &y * &y, BigInt::one());

            // convergents alternate around √n, each one between the previous two
            let n_big = BigInt::from(n);
            let bound = BigInt::from(2 * root + 1);
            let convs: Vec<_> = cf.convergents().take(12).collect();
            for (k, conv) in convs.iter().enumerate() {
                let (p, q) = (conv.numer(), conv.denom());
                let norm = p * p - &n_big * q * q;
                assert_eq!(norm < BigInt::zero(), k % 2 == 0);
                assert!(norm.abs() <= bound);

                if k >= 2 {
                    let (lo, hi) = if k % 2 == 0 {
                        (&convs[k - 2], &convs[k - 1])
                    } else {
                        (&convs[k - 1], &convs[k - 2])
                    };
                    assert!(lo < conv && conv < hi);
                }
            }
        }
    }

    #[test]
    fn fmt_test() {
        assert_eq!(format!("{}", SqrtExpansion::new(24u64).unwrap()), "[4; (1, 8)]");
        assert_eq!(format!("{}", SqrtExpansion::new(2u64).unwrap()), "[1; (2)]");
        assert_eq!(
            format!("{}", SqrtExpansion::new(7u64).unwrap()),
            "[2; (1, 1, 1, 4)]"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_test() {
        let cf = SqrtExpansion::new(23u64).unwrap();
        let json = serde_json::to_string(&cf).unwrap();
        assert_eq!(json, r#"{"root":4,"period":[1,3,1,8]}"#);
        let back: SqrtExpansion<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cf);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_invalid_parts_test() {
        let empty = serde_json::from_str::<SqrtExpansion<u64>>(r#"{"root":4,"period":[]}"#);
        assert!(empty.unwrap_err().to_string().contains("cannot be empty"));

        let zero = serde_json::from_str::<SqrtExpansion<u64>>(r#"{"root":4,"period":[1,0]}"#);
        assert!(zero.unwrap_err().to_string().contains("must be positive"));

        assert!(serde_json::from_str::<SqrtExpansion<u64>>(r#"{"root":4}"#).is_err());
    }
}
