//! Stored-procedure mapper.
//!
//! [`Mapper`] is the caller-facing entry point: it owns an executor and a
//! connection string, and every public operation runs one complete,
//! self-contained call against them.
//!
//! Per-call lifecycle:
//!
//! ```text
//! open session -> prepare call -> bind parameters -> execute
//!   -> drain/map rows -> capture output parameters -> close session
//! ```
//!
//! The close step is unconditional: it runs after execution and mapping
//! failures alike, before the error surfaces to the caller. A failed open
//! surfaces as [`Error::Connection`] without proceeding to execution.

use sproc_types::SqlValue;

use crate::error::{Error, Result};
use crate::executor::{Command, ExecuteType, Executor, Session};
use crate::param::{ParamDirection, Parameter};
use crate::row_target::{NullHandling, RowTarget, populate_from_row};

/// Invokes stored procedures and maps their results onto caller-supplied
/// types.
///
/// Public operations take `&mut self`, so one `Mapper` handles one call at
/// a time; clone the executor into a second instance for concurrent calls.
/// Each call opens and closes its own session — instances never share or
/// reuse sessions.
pub struct Mapper<E: Executor> {
    executor: E,
    connection_string: String,
    output_parameters: Vec<Parameter>,
}

impl<E: Executor> Mapper<E> {
    /// Create a mapper over an executor and a connection string.
    ///
    /// The connection string is passed to [`Executor::open`] verbatim on
    /// every call; the mapper does not interpret it.
    pub fn new(executor: E, connection_string: impl Into<String>) -> Self {
        Self {
            executor,
            connection_string: connection_string.into(),
            output_parameters: Vec::new(),
        }
    }

    /// The connection string this mapper opens sessions with.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Output parameters captured by the most recent call that bound
    /// parameters.
    ///
    /// Contains one entry per bound parameter whose direction carries a
    /// value back (`Output`, `InputOutput`, `ReturnValue`), with its
    /// post-execution value and its unprefixed name, in binding order.
    ///
    /// Known sharp edge: a call that binds no parameters leaves the
    /// previous call's list in place rather than clearing it. Callers that
    /// interleave parameterless calls must not read stale entries from
    /// here.
    #[must_use]
    pub fn output_parameters(&self) -> &[Parameter] {
        &self.output_parameters
    }

    /// Execute a procedure and map the first result row onto one `T`.
    ///
    /// Equivalent to [`execute_single_with`](Self::execute_single_with)
    /// with no parameters.
    ///
    /// # Errors
    ///
    /// See [`execute_single_with`](Self::execute_single_with).
    pub fn execute_single<T: RowTarget>(&mut self, procedure: &str) -> Result<T> {
        self.execute_single_with(procedure, &[])
    }

    /// Execute a procedure with parameters and map the first result row
    /// onto one `T`.
    ///
    /// Only the first row is read; remaining rows are discarded with the
    /// reader. Every column of that row is assigned through
    /// [`RowTarget::set_field`], NULL values included — a NULL lands in an
    /// `Option` field as `None` and fails a non-optional field. With zero
    /// rows the default-constructed instance is returned unpopulated.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the session cannot be opened.
    /// - [`Error::Execution`] if the executor rejects the call.
    /// - [`Error::Mapping`] if a result column has no matching field.
    /// - [`Error::Type`] if a column value is incompatible with its field.
    pub fn execute_single_with<T: RowTarget>(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<T> {
        self.call(procedure, params, ExecuteType::Query, |command| {
            let mut rows = command.run_query().map_err(Error::Execution)?;
            let mut target = T::default();
            if let Some(row) = rows.next() {
                let row = row.map_err(Error::Execution)?;
                populate_from_row(&mut target, &row, NullHandling::Assign)?;
            }
            Ok(target)
        })
    }

    /// Execute a procedure and map every result row onto a `Vec<T>`.
    ///
    /// Equivalent to [`execute_list_with`](Self::execute_list_with) with no
    /// parameters.
    ///
    /// # Errors
    ///
    /// See [`execute_list_with`](Self::execute_list_with).
    pub fn execute_list<T: RowTarget>(&mut self, procedure: &str) -> Result<Vec<T>> {
        self.execute_list_with(procedure, &[])
    }

    /// Execute a procedure with parameters and map every result row onto a
    /// `Vec<T>`, in result-set order.
    ///
    /// Zero rows yield an empty vector. Unlike single-row mapping, NULL
    /// columns are skipped here: the field keeps the value `T::default()`
    /// gave it. A mapping failure on any row fails the whole call; rows
    /// mapped before it are not returned.
    ///
    /// # Errors
    ///
    /// Same conditions as [`execute_single_with`](Self::execute_single_with).
    pub fn execute_list_with<T: RowTarget>(
        &mut self,
        procedure: &str,
        params: &[Parameter],
    ) -> Result<Vec<T>> {
        self.call(procedure, params, ExecuteType::Query, |command| {
            let rows = command.run_query().map_err(Error::Execution)?;
            let mut items = Vec::new();
            for row in rows {
                let row = row.map_err(Error::Execution)?;
                let mut target = T::default();
                populate_from_row(&mut target, &row, NullHandling::Skip)?;
                items.push(target);
            }
            Ok(items)
        })
    }

    /// Execute a procedure and return the affected-row count the executor
    /// reports, including 0.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] or [`Error::Execution`], as for the mapping
    /// operations.
    pub fn execute_non_query(&mut self, procedure: &str, params: &[Parameter]) -> Result<u64> {
        self.call(procedure, params, ExecuteType::NonQuery, |command| {
            command.run_non_query().map_err(Error::Execution)
        })
    }

    /// Execute a procedure and return a single value.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] or [`Error::Execution`], as for the mapping
    /// operations.
    pub fn execute_scalar(&mut self, procedure: &str, params: &[Parameter]) -> Result<SqlValue> {
        self.call(procedure, params, ExecuteType::Scalar, |command| {
            command.run_scalar().map_err(Error::Execution)
        })
    }

    /// Run one complete call: open, execute `body`, close.
    fn call<R, F>(
        &mut self,
        procedure: &str,
        params: &[Parameter],
        mode: ExecuteType,
        body: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut <E::Session as Session>::Command) -> Result<R>,
    {
        tracing::debug!(
            procedure,
            mode = mode.as_str(),
            params = params.len(),
            "executing stored procedure"
        );

        let mut session = self
            .executor
            .open(&self.connection_string)
            .map_err(Error::Connection)?;

        let outcome = self.run_call(&mut session, procedure, params, body);

        // Unconditional: runs on execution and mapping failures too.
        session.close();

        if let Err(ref error) = outcome {
            tracing::warn!(procedure, %error, "stored procedure call failed");
        }
        outcome
    }

    fn run_call<R, F>(
        &mut self,
        session: &mut E::Session,
        procedure: &str,
        params: &[Parameter],
        body: F,
    ) -> Result<R>
    where
        F: FnOnce(&mut <E::Session as Session>::Command) -> Result<R>,
    {
        let mut command = session.prepare_call(procedure).map_err(Error::Execution)?;

        let marker = self.executor.parameter_marker();
        for param in params {
            command
                .bind(&bound_name(marker, &param.name), param.direction, &param.value)
                .map_err(Error::Execution)?;
        }

        let value = body(&mut command)?;

        // A call that binds nothing leaves the previous capture in place.
        if !params.is_empty() {
            self.output_parameters = capture_outputs(&command, params, marker);
        }
        Ok(value)
    }
}

/// Parameter name as the executor sees it.
fn bound_name(marker: char, name: &str) -> String {
    let mut bound = String::with_capacity(name.len() + 1);
    bound.push(marker);
    bound.push_str(name);
    bound
}

/// Copy post-execution values of output-carrying parameters into a fresh
/// list, unprefixed names restored.
fn capture_outputs<C: Command>(command: &C, params: &[Parameter], marker: char) -> Vec<Parameter> {
    let mut outputs = Vec::new();
    for param in params {
        if !param.direction.receives_value() {
            continue;
        }
        let value = command
            .parameter_value(&bound_name(marker, &param.name))
            .unwrap_or(SqlValue::Null);
        outputs.push(Parameter {
            name: param.name.clone(),
            direction: ParamDirection::Output,
            value,
        });
    }
    outputs
}
