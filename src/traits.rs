use num_rational::Ratio;

/// This trait represents a real number that is computable.
/// See [Wiki](https://en.wikipedia.org/wiki/Computable_number)
pub trait Computable<T> {
    /// Return an approximated rational representation of the number
    /// The `limit` argument specify the maximum value of denominator. This will
    /// ensures that the approximation is bounded by `1/limit^2`.
    fn approximated(&self, limit: &T) -> Ratio<T>;
}
