//! Number theory helpers for puzzle solving: periodic continued fraction of
//! square roots with exact convergents, primality tests and pythagorean triples.

mod cont_frac;
mod error;
pub mod primality;
pub mod pythagorean;
pub mod traits;

pub use cont_frac::{Coefficients, Convergents, ExpansionBase, SqrtExpansion};
pub use error::{ExpansionError, PartsError};
pub use primality::is_prime;
pub use pythagorean::PythagoreanTriple;
