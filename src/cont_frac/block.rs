use num_integer::Integer;
use num_rational::Ratio;
use num_traits::{NumRef, One, RefNum, Zero};
use std::mem::swap;

/// The two latest convergents `p_(k-1)/q_(k-1)` and `p_(k-2)/q_(k-2)` of a
/// simple continued fraction, which is all the state needed to fold in the next coefficient.
/// See <https://crypto.stanford.edu/pbc/notes/contfrac/compute.html>
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T> {
    pm1: T, // p_(k-1)
    pm2: T, // p_(k-2)
    qm1: T, // q_(k-1)
    qm2: T, // q_(k-2)
}

impl<T: Zero + One> Block<T> {
    /// Starting state `p_(-1)/q_(-1) = 1/0`, `p_(-2)/q_(-2) = 0/1`
    pub fn identity() -> Self {
        Block {
            pm1: T::one(),
            pm2: T::zero(),
            qm1: T::zero(),
            qm2: T::one(),
        }
    }
}

impl<T> Block<T> {
    /// push the latest convergent to the block
    pub fn update(&mut self, p: T, q: T) {
        swap(&mut self.pm2, &mut self.pm1); // self.pm2 = self.pm1
        swap(&mut self.qm2, &mut self.qm1); // self.qm2 = self.qm1
        self.pm1 = p;
        self.qm1 = q;
    }
}

impl<T: Integer + NumRef + Clone> Block<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// Numerator and denominator after appending coefficient `a`, without updating the block
    pub fn rmove(&self, a: &T) -> (T, T) {
        let p = a * &self.pm1 + &self.pm2;
        let q = a * &self.qm1 + &self.qm2;
        (p, q)
    }

    /// Append coefficient `a` and return the new convergent
    pub fn push(&mut self, a: &T) -> Ratio<T> {
        let (p, q) = self.rmove(a);
        self.update(p.clone(), q.clone());
        // consecutive convergents are always coprime
        Ratio::new_raw(p, q)
    }
}
