use thiserror::Error;

/// Error returned when a square root expansion cannot be derived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError<T> {
    /// The input is a perfect square, so its square root has no periodic part
    #[error("value cannot be a square: {0}")]
    Square(T),

    /// The input is negative and has no real square root
    #[error("value cannot be negative: {0}")]
    Negative(T),

    /// The recurrence didn't return to its initial state within the step guard.
    /// This is unreachable for valid input.
    #[error("no period found after {steps} steps")]
    PeriodNotFound { steps: usize },
}

/// Error returned when an expansion is rebuilt from inconsistent parts.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartsError {
    /// The repeating block has no coefficients
    #[error("the periodic part cannot be empty")]
    EmptyPeriod,

    /// A coefficient of the repeating block is zero or negative
    #[error("periodic coefficient at {index} must be positive")]
    NonPositive { index: usize },
}
