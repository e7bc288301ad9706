//! Scripted mock executor for unit testing.
//!
//! [`MockExecutor`] implements the executor seam without a database:
//! responses are scripted per procedure name, output-parameter values can
//! be attached to any procedure, and connection failures can be injected.
//! The executor also records what reached it — bound parameters, procedure
//! names, session open/close counts — so tests can assert on the mapper's
//! side effects, not just its return values.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sproc_testing::{MockExecutor, MockResponse};
//! use sproc_types::SqlValue;
//!
//! let executor = MockExecutor::builder()
//!     .with_procedure(
//!         "GetUser",
//!         MockResponse::rows(&["id", "name"], vec![
//!             vec![SqlValue::Int(1), SqlValue::String("Alice".into())],
//!         ]),
//!     )
//!     .build();
//!
//! let mut mapper = sproc_client::Mapper::new(executor.clone(), "mock://");
//! // ... drive the mapper, then:
//! assert_eq!(executor.opened(), executor.closed());
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use sproc_client::{
    Column, ColumnSet, Command, ExecuteError, Executor, ParamDirection, Row, Session,
};
use sproc_types::SqlValue;

/// Canned response for one scripted procedure.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return rows with the given columns.
    Rows {
        /// Column names, in result-set order.
        columns: Vec<String>,
        /// Row data, one inner vector per row.
        rows: Vec<Vec<SqlValue>>,
    },

    /// Return an affected-row count.
    RowsAffected(u64),

    /// Return a single value.
    Scalar(SqlValue),

    /// Fail the execution with a server error.
    Error {
        /// Server-assigned error number.
        number: i32,
        /// Error message.
        message: String,
    },
}

impl MockResponse {
    /// A row-set response.
    pub fn rows<S: AsRef<str>>(columns: &[S], rows: Vec<Vec<SqlValue>>) -> Self {
        Self::Rows {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows,
        }
    }

    /// A row-set response with no columns and no rows.
    #[must_use]
    pub fn empty() -> Self {
        Self::Rows {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// An affected-row-count response.
    #[must_use]
    pub fn rows_affected(count: u64) -> Self {
        Self::RowsAffected(count)
    }

    /// A single-value response.
    #[must_use]
    pub fn scalar(value: SqlValue) -> Self {
        Self::Scalar(value)
    }

    /// A server-error response.
    pub fn error(number: i32, message: impl Into<String>) -> Self {
        Self::Error {
            number,
            message: message.into(),
        }
    }
}

/// A parameter exactly as the executor received it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Name as bound, marker prefix included.
    pub name: String,
    /// Direction as bound.
    pub direction: ParamDirection,
    /// Value as bound.
    pub value: SqlValue,
}

/// One scripted procedure: its response and its output-parameter values.
#[derive(Debug, Clone)]
struct ScriptedProcedure {
    response: MockResponse,
    outputs: Vec<(String, SqlValue)>,
}

#[derive(Default)]
#[derive(Debug)]
struct Recorded {
    /// Parameters bound by the most recent prepared call.
    bound: Vec<BoundParam>,
    /// Procedure names in call order.
    procedures: Vec<String>,
}

#[derive(Debug)]
struct Shared {
    procedures: HashMap<String, ScriptedProcedure>,
    fail_open: Option<String>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    recorded: Mutex<Recorded>,
}

/// Builder for [`MockExecutor`].
#[derive(Default)]
pub struct MockExecutorBuilder {
    procedures: HashMap<String, ScriptedProcedure>,
    fail_open: Option<String>,
}

impl MockExecutorBuilder {
    /// Script a procedure's response.
    #[must_use]
    pub fn with_procedure(mut self, name: impl Into<String>, response: MockResponse) -> Self {
        self.procedures.insert(
            name.into(),
            ScriptedProcedure {
                response,
                outputs: Vec::new(),
            },
        );
        self
    }

    /// Attach a post-execution output-parameter value to a scripted
    /// procedure. Names are unprefixed, as a caller would write them.
    #[must_use]
    pub fn with_output(
        mut self,
        procedure: &str,
        name: impl Into<String>,
        value: SqlValue,
    ) -> Self {
        self.procedures
            .entry(procedure.to_string())
            .or_insert_with(|| ScriptedProcedure {
                response: MockResponse::empty(),
                outputs: Vec::new(),
            })
            .outputs
            .push((name.into(), value));
        self
    }

    /// Make every `open` fail with the given message.
    #[must_use]
    pub fn fail_open(mut self, message: impl Into<String>) -> Self {
        self.fail_open = Some(message.into());
        self
    }

    /// Build the executor.
    #[must_use]
    pub fn build(self) -> MockExecutor {
        MockExecutor {
            shared: Arc::new(Shared {
                procedures: self.procedures,
                fail_open: self.fail_open,
                opened: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
                recorded: Mutex::new(Recorded::default()),
            }),
        }
    }
}

/// A scripted, thread-safe executor for tests.
///
/// Cloning is cheap and shares the script and the recorded state, so a test
/// can keep a clone for assertions while the mapper owns the other.
#[derive(Clone)]
pub struct MockExecutor {
    shared: Arc<Shared>,
}

impl MockExecutor {
    /// Start building a mock executor.
    #[must_use]
    pub fn builder() -> MockExecutorBuilder {
        MockExecutorBuilder::default()
    }

    /// Number of sessions opened so far.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.shared.opened.load(Ordering::SeqCst)
    }

    /// Number of sessions closed so far.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.shared.closed.load(Ordering::SeqCst)
    }

    /// Number of sessions currently open. Zero after every well-behaved
    /// call, successful or not.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.opened() - self.closed()
    }

    /// Parameters bound by the most recent prepared call, as received.
    #[must_use]
    pub fn last_bound(&self) -> Vec<BoundParam> {
        self.shared.recorded.lock().bound.clone()
    }

    /// Procedure names prepared so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.shared.recorded.lock().procedures.clone()
    }
}

impl Executor for MockExecutor {
    type Session = MockSession;

    fn open(&self, connection_string: &str) -> Result<MockSession, ExecuteError> {
        if let Some(ref message) = self.shared.fail_open {
            tracing::debug!(connection_string, "mock refusing to open session");
            return Err(ExecuteError::Open(message.clone()));
        }
        self.shared.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            shared: Arc::clone(&self.shared),
            closed: false,
        })
    }
}

/// One open mock session.
pub struct MockSession {
    shared: Arc<Shared>,
    closed: bool,
}

impl Session for MockSession {
    type Command = MockCommand;

    fn prepare_call(&mut self, procedure: &str) -> Result<MockCommand, ExecuteError> {
        let mut recorded = self.shared.recorded.lock();
        recorded.procedures.push(procedure.to_string());
        recorded.bound.clear();
        drop(recorded);

        let scripted = self.shared.procedures.get(procedure).cloned().ok_or_else(|| {
            ExecuteError::Server {
                number: 2812,
                message: format!("could not find stored procedure '{procedure}'"),
            }
        })?;

        tracing::debug!(procedure, "mock prepared call");
        Ok(MockCommand {
            shared: Arc::clone(&self.shared),
            scripted,
        })
    }

    fn close(&mut self) {
        // Idempotent: only the first close counts.
        if !self.closed {
            self.closed = true;
            self.shared.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// One prepared mock call.
#[derive(Debug)]
pub struct MockCommand {
    shared: Arc<Shared>,
    scripted: ScriptedProcedure,
}

impl Command for MockCommand {
    type Rows = std::vec::IntoIter<Result<Row, ExecuteError>>;

    fn bind(
        &mut self,
        name: &str,
        direction: ParamDirection,
        value: &SqlValue,
    ) -> Result<(), ExecuteError> {
        self.shared.recorded.lock().bound.push(BoundParam {
            name: name.to_string(),
            direction,
            value: value.clone(),
        });
        Ok(())
    }

    fn run_query(&mut self) -> Result<Self::Rows, ExecuteError> {
        match &self.scripted.response {
            MockResponse::Rows { columns, rows } => {
                let column_set = Arc::new(ColumnSet::new(
                    columns
                        .iter()
                        .enumerate()
                        .map(|(i, name)| Column::new(name.clone(), i))
                        .collect(),
                ));
                let rows: Vec<_> = rows
                    .iter()
                    .map(|values| Ok(Row::new(Arc::clone(&column_set), values.clone())))
                    .collect();
                Ok(rows.into_iter())
            }
            MockResponse::Error { number, message } => Err(ExecuteError::Server {
                number: *number,
                message: message.clone(),
            }),
            // Non-query and scalar scripts expose no result set.
            MockResponse::RowsAffected(_) | MockResponse::Scalar(_) => Ok(Vec::new().into_iter()),
        }
    }

    fn run_non_query(&mut self) -> Result<u64, ExecuteError> {
        match &self.scripted.response {
            MockResponse::RowsAffected(count) => Ok(*count),
            MockResponse::Error { number, message } => Err(ExecuteError::Server {
                number: *number,
                message: message.clone(),
            }),
            MockResponse::Rows { .. } | MockResponse::Scalar(_) => Ok(0),
        }
    }

    fn run_scalar(&mut self) -> Result<SqlValue, ExecuteError> {
        match &self.scripted.response {
            MockResponse::Scalar(value) => Ok(value.clone()),
            MockResponse::Rows { rows, .. } => Ok(rows
                .first()
                .and_then(|row| row.first())
                .cloned()
                .unwrap_or(SqlValue::Null)),
            MockResponse::Error { number, message } => Err(ExecuteError::Server {
                number: *number,
                message: message.clone(),
            }),
            MockResponse::RowsAffected(_) => Ok(SqlValue::Null),
        }
    }

    fn parameter_value(&self, name: &str) -> Option<SqlValue> {
        let unprefixed = name.strip_prefix('@').unwrap_or(name);
        self.scripted
            .outputs
            .iter()
            .find(|(n, _)| n == unprefixed)
            .map(|(_, v)| v.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_accounting() {
        let executor = MockExecutor::builder()
            .with_procedure("Ping", MockResponse::empty())
            .build();

        let mut session = executor.open("mock://").unwrap();
        assert_eq!(executor.open_sessions(), 1);
        session.close();
        session.close(); // idempotent
        assert_eq!(executor.opened(), 1);
        assert_eq!(executor.closed(), 1);
    }

    #[test]
    fn test_fail_open_opens_nothing() {
        let executor = MockExecutor::builder().fail_open("network down").build();
        assert!(matches!(
            executor.open("mock://"),
            Err(ExecuteError::Open(_))
        ));
        assert_eq!(executor.opened(), 0);
    }

    #[test]
    fn test_unknown_procedure_is_server_error() {
        let executor = MockExecutor::builder().build();
        let mut session = executor.open("mock://").unwrap();
        let err = session.prepare_call("NoSuchProc").unwrap_err();
        assert!(matches!(err, ExecuteError::Server { number: 2812, .. }));
        session.close();
    }

    #[test]
    fn test_scripted_rows_come_back() {
        let executor = MockExecutor::builder()
            .with_procedure(
                "GetOne",
                MockResponse::rows(&["n"], vec![vec![SqlValue::Int(7)]]),
            )
            .build();

        let mut session = executor.open("mock://").unwrap();
        let mut command = session.prepare_call("GetOne").unwrap();
        let rows: Vec<_> = command.run_query().unwrap().collect();
        assert_eq!(rows.len(), 1);
        let row = rows.into_iter().next().unwrap().unwrap();
        assert_eq!(row.get_by_name::<i32>("n").unwrap(), 7);
        session.close();
    }

    #[test]
    fn test_parameter_value_strips_marker() {
        let executor = MockExecutor::builder()
            .with_output("DoWork", "total", SqlValue::Int(99))
            .build();

        let mut session = executor.open("mock://").unwrap();
        let command = session.prepare_call("DoWork").unwrap();
        assert_eq!(command.parameter_value("@total"), Some(SqlValue::Int(99)));
        assert_eq!(command.parameter_value("total"), Some(SqlValue::Int(99)));
        assert_eq!(command.parameter_value("@missing"), None);
        session.close();
    }
}
