//! Data structures and algorithms implementations related to
//! periodic continued fractions of square roots.
//!
//! # References:
//! - <https://pi.math.cornell.edu/~gautam/ContinuedFractions.pdf>
//! - <https://crypto.stanford.edu/pbc/notes/contfrac/>
//! - <http://www.numbertheory.org/courses/MP313/lectures/lecture17/page5.html>
//! - <https://en.wikipedia.org/wiki/Methods_of_computing_square_roots#Continued_fraction_expansion>

mod block;
mod sqrt;

pub use sqrt::*;
