//! Error types for problem setup, solving and snapshot I/O.

use solvers::SolverError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up or solving a heat problem.
#[derive(Debug, Error)]
pub enum HeatError {
    /// The parameter input ended before a required field.
    #[error("missing field `{field}` in parameter input")]
    MissingField {
        /// Name of the absent field
        field: &'static str,
    },

    /// A field could not be parsed as a real number.
    #[error("invalid number for `{field}`: {value:?}")]
    InvalidNumber {
        /// Name of the field being parsed
        field: &'static str,
        /// Offending token
        value: String,
    },

    /// Extra content after the last parameter.
    #[error("unexpected trailing input {token:?} after `th`")]
    TrailingInput {
        /// First unexpected token
        token: String,
    },

    /// A parsed parameter is outside its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the parameter
        name: &'static str,
        /// The invalid value
        value: f64,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// A snapshot file could not be parsed.
    #[error("malformed snapshot at line {line}: {message}")]
    MalformedSnapshot {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration could not be (de)serialized.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The linear solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A specialized `Result` type for heat problem operations.
pub type Result<T> = std::result::Result<T, HeatError>;

impl HeatError {
    /// Returns `true` if the parameter input was malformed or out of range.
    ///
    /// This includes `MissingField`, `InvalidNumber`, `TrailingInput`,
    /// `InvalidParameter` and `Json`.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HeatError::MissingField { .. }
                | HeatError::InvalidNumber { .. }
                | HeatError::TrailingInput { .. }
                | HeatError::InvalidParameter { .. }
                | HeatError::Json(_)
        )
    }

    /// Returns `true` if the failure came from the linear solver.
    pub fn is_solver_error(&self) -> bool {
        matches!(self, HeatError::Solver(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HeatError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HeatError::MissingField { field: "tc" };
        assert_eq!(err.to_string(), "missing field `tc` in parameter input");

        let err = HeatError::InvalidParameter {
            name: "h",
            value: 0.0,
            reason: "must be > 0",
        };
        assert_eq!(err.to_string(), "invalid parameter `h` = 0: must be > 0");
    }

    #[test]
    fn test_categories() {
        let input = HeatError::InvalidNumber {
            field: "width",
            value: "abc".to_string(),
        };
        assert!(input.is_input_error());
        assert!(!input.is_solver_error());

        let solver = HeatError::from(SolverError::NotCompressed);
        assert!(solver.is_solver_error());
        assert!(!solver.is_input_error());
    }
}
