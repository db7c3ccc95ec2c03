//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `GrowthboardError`
///
/// Allows early returns with custom error messages.
///
/// # Examples
///
/// ```rust
/// use growthboard_common::bail;
/// use growthboard_common::Result;
///
/// fn check_score(value: f64) -> Result<()> {
///     if value < 0.0 {
///         bail!("Score cannot be negative: {}", value);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::GrowthboardError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::GrowthboardError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::GrowthboardError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but for `GrowthboardError`
///
/// Checks a condition and returns an error if it is false.
///
/// # Examples
///
/// ```rust
/// use growthboard_common::ensure;
/// use growthboard_common::Result;
///
/// fn validate_limit(n: usize) -> Result<()> {
///     ensure!(n > 0, "Ranking limit must be positive, got: {}", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::GrowthboardError::new($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::GrowthboardError::new($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::GrowthboardError::new(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use growthboard_common::{with_context, Result};
///
/// fn read_sources() -> Result<String> {
///     std::fs::read_to_string("growthboard.yaml")
///         .map_err(|e| with_context!(e, "Failed to read configuration file"))
/// }
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::GrowthboardError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::GrowthboardError::with_source(format!($fmt, $($arg)*), $err)
    };
}
