//! The relational executor seam.
//!
//! The mapper does not speak any wire protocol of its own; it drives a
//! database through the trait family in this module. An executor
//! implementation owns everything below the call boundary: connection-string
//! interpretation, transport, dialect, timeouts, pooling.
//!
//! The trait surface is the minimum the mapper needs per call:
//!
//! ```text
//! Executor::open ──► Session::prepare_call ──► Command::bind*
//!                                              Command::run_{query,non_query,scalar}
//!                                              Command::parameter_value*
//!                    Session::close (unconditional, idempotent)
//! ```

use thiserror::Error;

use sproc_types::SqlValue;

use crate::param::ParamDirection;
use crate::row::Row;

/// Which executor operation a call issues, and how its result is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteType {
    /// Execute and read result rows.
    Query,
    /// Execute and read only the affected-row count.
    NonQuery,
    /// Execute and read a single value.
    Scalar,
}

impl ExecuteType {
    /// Static name, used as a structured logging field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::NonQuery => "non_query",
            Self::Scalar => "scalar",
        }
    }
}

impl std::fmt::Display for ExecuteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by an executor implementation.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The session could not be opened.
    #[error("cannot open session: {0}")]
    Open(String),

    /// The server rejected the call.
    #[error("server error {number}: {message}")]
    Server {
        /// Server-assigned error number.
        number: i32,
        /// Error message.
        message: String,
    },

    /// IO error in the transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A database transport capable of opening sessions.
///
/// Implementations are expected to be cheap to share; the mapper holds one
/// and calls [`open`](Executor::open) once per public operation.
pub trait Executor {
    /// Session type produced by [`open`](Executor::open).
    type Session: Session;

    /// The parameter-marker character the backing database expects.
    ///
    /// Parameter names cross the caller boundary unprefixed; the mapper
    /// applies this marker at bind time (`total` binds as `@total` with the
    /// default).
    fn parameter_marker(&self) -> char {
        '@'
    }

    /// Open a session for one call.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::Open`] (or a transport error) if the session
    /// cannot be established.
    fn open(&self, connection_string: &str) -> Result<Self::Session, ExecuteError>;
}

/// One open database session.
pub trait Session {
    /// Command type produced by [`prepare_call`](Session::prepare_call).
    type Command: Command;

    /// Prepare a stored-procedure call.
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure cannot be prepared on this session.
    fn prepare_call(&mut self, procedure: &str) -> Result<Self::Command, ExecuteError>;

    /// Close the session.
    ///
    /// Must be idempotent and must not fail; the mapper invokes it
    /// unconditionally, including after mid-call errors.
    fn close(&mut self);
}

/// A prepared stored-procedure call.
pub trait Command {
    /// Row cursor yielded by [`run_query`](Command::run_query), in
    /// result-set order.
    type Rows: Iterator<Item = Result<Row, ExecuteError>>;

    /// Bind a parameter by (marker-prefixed) name.
    ///
    /// Binding order carries no meaning; parameters are matched by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be bound.
    fn bind(
        &mut self,
        name: &str,
        direction: ParamDirection,
        value: &SqlValue,
    ) -> Result<(), ExecuteError>;

    /// Execute and return the result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the call.
    fn run_query(&mut self) -> Result<Self::Rows, ExecuteError>;

    /// Execute and return the affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the call.
    fn run_non_query(&mut self) -> Result<u64, ExecuteError>;

    /// Execute and return a single value.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the call.
    fn run_scalar(&mut self) -> Result<SqlValue, ExecuteError>;

    /// Post-execution value of a bound parameter, by the same
    /// (marker-prefixed) name it was bound under.
    ///
    /// Only meaningful after a `run_*` call, for parameters bound with an
    /// output-carrying direction.
    fn parameter_value(&self, name: &str) -> Option<SqlValue>;
}
