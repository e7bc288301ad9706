//! # sproc-types
//!
//! SQL value representation and type conversions for the sproc workspace.
//!
//! This crate defines the dynamically typed value that crosses the executor
//! boundary ([`SqlValue`]) and the two conversion traits that connect it to
//! Rust types: [`FromSql`] for reading result columns and output parameters,
//! [`ToSql`] for binding input parameters.
//!
//! There is deliberately no coercion machinery beyond what these traits
//! define: an assignment between incompatible representations is a hard
//! [`TypeError`], never a best-effort conversion.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod from_sql;
pub mod to_sql;
pub mod value;

pub use error::TypeError;
pub use from_sql::FromSql;
pub use to_sql::ToSql;
pub use value::SqlValue;
