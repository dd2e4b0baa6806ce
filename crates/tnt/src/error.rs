//! Error types for tnt.
//!
//! Every fallible operation returns [`TensorError`]. Preconditions are
//! checked with [`ensure!`](crate::ensure) and
//! [`ensure_bounds!`](crate::ensure_bounds), which compile to nothing when
//! the `disable-checks` feature is on.

use std::fmt;
use thiserror::Error;

/// Source position where a check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[inline]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Category of a [`TensorError`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    OutOfBoundsAccess,
    FeatureNotSupported,
}

/// Errors that can occur in tensor operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TensorError {
    /// A shape, rank, or value-domain precondition was violated.
    #[error("InvalidParameter\n\tFunction: {function}\n\tLocation: {location}\n\tMessage: {message}")]
    InvalidParameter {
        function: &'static str,
        location: SourceLocation,
        message: String,
    },

    /// An index or range fell outside a container.
    #[error("OutOfBoundsAccess\n\tFunction: {function}\n\tLocation: {location}\n\tMessage: {message}")]
    OutOfBoundsAccess {
        function: &'static str,
        location: SourceLocation,
        message: String,
    },

    /// The element type has no implementation for the requested operation.
    #[error("FeatureNotSupported\n\tFunction: {function}\n\tLocation: {location}\n\tMessage: {message}")]
    FeatureNotSupported {
        function: &'static str,
        location: SourceLocation,
        message: String,
    },
}

impl TensorError {
    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::OutOfBoundsAccess { .. } => ErrorKind::OutOfBoundsAccess,
            Self::FeatureNotSupported { .. } => ErrorKind::FeatureNotSupported,
        }
    }

    /// Name of the function that raised the error.
    pub fn function(&self) -> &'static str {
        match self {
            Self::InvalidParameter { function, .. }
            | Self::OutOfBoundsAccess { function, .. }
            | Self::FeatureNotSupported { function, .. } => function,
        }
    }

    /// Human-readable description of the violated condition.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidParameter { message, .. }
            | Self::OutOfBoundsAccess { message, .. }
            | Self::FeatureNotSupported { message, .. } => message,
        }
    }

    #[doc(hidden)]
    pub fn out_of_bounds(
        function: &'static str,
        location: SourceLocation,
        index: impl fmt::Display,
        start: impl fmt::Display,
        end: impl fmt::Display,
    ) -> Self {
        Self::OutOfBoundsAccess {
            function,
            location,
            message: format!("Out of bounds access. Index: {index} Range: [{start} -> {end})"),
        }
    }
}

/// Build a [`TensorError`] of the given kind at the current source location.
///
/// ```
/// use tnt::{ErrorKind, tensor_error};
///
/// let err = tensor_error!(InvalidParameter, "tnt::demo()", "bad value {}", 3);
/// assert_eq!(err.kind(), ErrorKind::InvalidParameter);
/// assert_eq!(err.message(), "bad value 3");
/// ```
#[macro_export]
macro_rules! tensor_error {
    ($kind:ident, $function:expr, $($msg:tt)+) => {
        $crate::error::TensorError::$kind {
            function: $function,
            location: $crate::error::SourceLocation::new(file!(), line!()),
            message: format!($($msg)+),
        }
    };
}

/// Return early with an error if `cond` is false.
///
/// Compiles to nothing when the `disable-checks` feature is on.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident, $function:expr, $($msg:tt)+) => {
        if $crate::config::CHECKS_ENABLED && !($cond) {
            return Err($crate::tensor_error!($kind, $function, $($msg)+));
        }
    };
}

/// Return early with `OutOfBoundsAccess` unless `start <= value < end`.
///
/// Compiles to nothing when the `disable-checks` feature is on.
#[macro_export]
macro_rules! ensure_bounds {
    ($function:expr, $value:expr, $start:expr, $end:expr) => {
        if $crate::config::CHECKS_ENABLED {
            let (value, start, end) = ($value, $start, $end);
            if !(start <= value && value < end) {
                return Err($crate::error::TensorError::out_of_bounds(
                    $function,
                    $crate::error::SourceLocation::new(file!(), line!()),
                    value,
                    start,
                    end,
                ));
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(v: i32) -> Result<i32, TensorError> {
        crate::ensure!(v > 0, InvalidParameter, "tnt::check_positive()", "{v} is not positive");
        Ok(v)
    }

    fn check_index(i: usize) -> Result<usize, TensorError> {
        crate::ensure_bounds!("tnt::check_index()", i, 0usize, 4usize);
        Ok(i)
    }

    #[test]
    fn test_ensure_passes() {
        assert_eq!(check_positive(3).unwrap(), 3);
    }

    #[test]
    fn test_ensure_fails() {
        let err = check_positive(-1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.function(), "tnt::check_positive()");
        assert_eq!(err.message(), "-1 is not positive");
    }

    #[test]
    fn test_bounds_message() {
        let err = check_index(4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBoundsAccess);
        assert_eq!(err.message(), "Out of bounds access. Index: 4 Range: [0 -> 4)");
        assert!(check_index(3).is_ok());
    }

    #[test]
    fn test_display_layout() {
        let err = crate::tensor_error!(FeatureNotSupported, "tnt::f()", "nope");
        let text = err.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FeatureNotSupported");
        assert_eq!(lines[1], "\tFunction: tnt::f()");
        assert!(lines[2].starts_with("\tLocation: "));
        assert!(lines[2].contains("error.rs:"));
        assert_eq!(lines[3], "\tMessage: nope");
    }
}
