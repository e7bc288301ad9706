//! Mapper error types.

use sproc_types::TypeError;
use thiserror::Error;

use crate::executor::ExecuteError;

/// Errors that can occur during a stored-procedure call.
#[derive(Debug, Error)]
pub enum Error {
    /// The session could not be opened.
    ///
    /// This surfaces to the caller directly; a failed open never proceeds
    /// to execution.
    #[error("connection failed: {0}")]
    Connection(ExecuteError),

    /// The executor rejected the call (bad procedure name, constraint
    /// violation, transport failure mid-stream).
    #[error("execution failed: {0}")]
    Execution(ExecuteError),

    /// A result column has no identically named field on the target type.
    #[error("no field named `{column}` on `{target}`")]
    Mapping {
        /// Result column name.
        column: String,
        /// Target type name.
        target: &'static str,
    },

    /// A column value could not be assigned to its matching field.
    #[error("column `{column}`: {source}")]
    Type {
        /// Result column name.
        column: String,
        /// Underlying conversion error.
        source: TypeError,
    },
}

impl Error {
    /// Check if this error came from the executor rather than from mapping.
    #[must_use]
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Execution(_))
    }

    /// Get the result column this error is about, if any.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Mapping { column, .. } | Self::Type { column, .. } => Some(column.as_str()),
            _ => None,
        }
    }
}

/// Error from assigning a single column value to a target field.
///
/// Returned by [`RowTarget::set_field`](crate::row_target::RowTarget::set_field);
/// the mapper attaches the column and target-type context before surfacing
/// it as an [`Error`].
#[derive(Debug, Error)]
pub enum FieldError {
    /// No field with the column's name exists on the target type.
    #[error("no matching field")]
    NoMatchingField,

    /// The column value is incompatible with the field's declared type.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result type for mapper operations.
pub type Result<T> = std::result::Result<T, Error>;
