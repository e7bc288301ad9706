//! # sproc-client
//!
//! Stored-procedure invocation with generic row-to-struct mapping.
//!
//! This is the primary public API surface for the sproc-rs project. It wraps
//! a pluggable [`Executor`] (the database transport, supplied by the caller)
//! with a [`Mapper`] that binds named parameters, dispatches one of three
//! execution modes, and materializes result rows onto caller-supplied types
//! by exact column-name/field-name matching.
//!
//! ## Call model
//!
//! Every public operation is synchronous and self-contained: it opens a
//! fresh session, prepares and binds the call, executes, drains what it
//! needs, captures output parameters, and closes the session before
//! returning — on failure paths too. Sessions are never shared between or
//! reused across calls.
//!
//! ## Mapping contract
//!
//! - Column-to-field matching is an exact, case-sensitive name comparison.
//!   No case folding, no `snake_case` normalization. A result column with
//!   no identically named field is an error, not a skip.
//! - No type coercion beyond what [`FromSql`] defines; an incompatible
//!   assignment fails the call.
//! - [`Mapper::execute_single`] assigns NULL columns through the setter
//!   (an `Option` field becomes `None`); [`Mapper::execute_list`] skips
//!   NULL columns, leaving fields at their `Default`-constructed values.
//!   Callers relying on null-handling must pick the call shape accordingly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sproc_client::{Mapper, Parameter};
//! use sproc_derive::RowTarget;
//!
//! #[derive(Default, RowTarget)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let mut mapper = Mapper::new(executor, "Server=db;Database=app;");
//!
//! let user: User = mapper.execute_single_with(
//!     "GetUserById",
//!     &[Parameter::input("id", &42)?],
//! )?;
//!
//! let all: Vec<User> = mapper.execute_list("GetAllUsers")?;
//!
//! let affected = mapper.execute_non_query(
//!     "DeactivateUser",
//!     &[Parameter::input("id", &42)?, Parameter::output("rows")],
//! )?;
//! let outputs = mapper.output_parameters();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod executor;
pub mod mapper;
pub mod param;
pub mod row;
pub mod row_target;

// Re-export commonly used types
pub use error::{Error, FieldError, Result};
pub use executor::{Command, ExecuteError, ExecuteType, Executor, Session};
pub use mapper::Mapper;
pub use param::{ParamDirection, Parameter, ToParams};
pub use row::{Column, ColumnSet, Row};
pub use row_target::{NullHandling, RowTarget, populate_from_row};
pub use sproc_types::{FromSql, SqlValue, ToSql, TypeError};
