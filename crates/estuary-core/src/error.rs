//! Error type for estuary-core.
//!
//! Only structural problems are reported: non-positive geometry or step
//! size, negative durations, non-finite inputs, malformed slices and
//! unreadable scenarios. Physical plausibility is never checked.

use thiserror::Error;

/// Root error type for all estuary-core failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstuaryError {
    /// A value that divides something (volume, depth, time step) was <= 0.
    #[error("{name} = {value} must be positive")]
    NonPositive { name: &'static str, value: f64 },

    /// A duration or rate that must be >= 0 was negative.
    #[error("{name} = {value} must be non-negative")]
    Negative { name: &'static str, value: f64 },

    /// NaN or infinite input.
    #[error("{name} = {value} is not finite")]
    NonFinite { name: &'static str, value: f64 },

    /// The time step vanishes in floating point next to the end time, so the
    /// marching loop could never finish.
    #[error(
        "time_step_hours = {time_step_hours} is too small to advance past end_time_hours = {end_time_hours}"
    )]
    StepTooSmall {
        time_step_hours: f64,
        end_time_hours: f64,
    },

    /// A slice had the wrong number of elements.
    #[error("expected {expected} {what}, got {got}")]
    Length {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Scenario could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

pub type EstuaryResult<T> = Result<T, EstuaryError>;

/// Reject NaN/inf.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> EstuaryResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EstuaryError::NonFinite { name, value })
    }
}

/// Reject NaN/inf and anything <= 0.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> EstuaryResult<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EstuaryError::NonPositive { name, value })
    }
}

/// Reject NaN/inf and anything < 0.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> EstuaryResult<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(EstuaryError::Negative { name, value })
    }
}
