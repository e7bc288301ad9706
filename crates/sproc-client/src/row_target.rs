//! Row-to-struct mapping.
//!
//! This module defines the [`RowTarget`] trait, the capability a type needs
//! to receive result columns by name, and [`populate_from_row`], the mapping
//! algorithm itself.
//!
//! ## Derive Macro
//!
//! The recommended way to implement `RowTarget` is via the derive macro from
//! `sproc-derive`, which generates a per-type setter table at compile time:
//!
//! ```rust,ignore
//! use sproc_derive::RowTarget;
//!
//! #[derive(Default, RowTarget)]
//! struct User {
//!     id: i32,
//!     #[sproc(rename = "UserName")]
//!     name: String,
//!     email: Option<String>,
//! }
//! ```
//!
//! ## Supported Attributes
//!
//! - `#[sproc(rename = "column_name")]` - Match a differently named column
//! - `#[sproc(rename_all = "PascalCase")]` - Apply a naming convention to all fields
//! - `#[sproc(skip)]` - Field is never assignable from a column

use sproc_types::SqlValue;

use crate::error::{Error, FieldError};
use crate::row::Row;

/// Trait for types that can be populated from result columns.
///
/// The `Default` bound supplies the zero-argument construction the mapper
/// relies on: one default instance per row (list mode), or a single default
/// instance populated from the first row (single mode).
///
/// This trait is typically implemented via the `#[derive(RowTarget)]` macro,
/// but can also be implemented manually:
///
/// ```rust,ignore
/// use sproc_client::{FieldError, FromSql, RowTarget, SqlValue};
///
/// #[derive(Default)]
/// struct User {
///     id: i32,
///     name: String,
/// }
///
/// impl RowTarget for User {
///     fn set_field(&mut self, column: &str, value: &SqlValue) -> Result<(), FieldError> {
///         match column {
///             "id" => self.id = FromSql::from_sql(value)?,
///             "name" => self.name = FromSql::from_sql(value)?,
///             _ => return Err(FieldError::NoMatchingField),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait RowTarget: Default {
    /// Assign the value of the named column to the matching field.
    ///
    /// Matching is an exact, case-sensitive comparison against the field
    /// name (or its configured rename).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NoMatchingField`] if no field matches the
    /// column, or a conversion error if the value is incompatible with the
    /// field's type.
    fn set_field(&mut self, column: &str, value: &SqlValue) -> Result<(), FieldError>;
}

/// How NULL columns are treated during population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullHandling {
    /// Assign NULL columns through the setter. An `Option` field becomes
    /// `None`; a non-optional field fails with a type error. Single-row
    /// mapping uses this mode.
    Assign,
    /// Skip NULL columns, leaving the field at its default-constructed
    /// value. List mapping uses this mode.
    Skip,
}

static NULL: SqlValue = SqlValue::Null;

/// Populate `target` from every column of `row`.
///
/// Columns are visited in result-set order. Each column name must match a
/// field on `T` exactly; the first non-matching column fails the whole
/// mapping.
///
/// # Errors
///
/// Returns [`Error::Mapping`] for a column with no matching field, or
/// [`Error::Type`] for a value incompatible with its field.
pub fn populate_from_row<T: RowTarget>(
    target: &mut T,
    row: &Row,
    nulls: NullHandling,
) -> Result<(), Error> {
    for column in row.columns() {
        let value = row.value(column.index).unwrap_or(&NULL);
        if nulls == NullHandling::Skip && value.is_null() {
            continue;
        }
        target.set_field(&column.name, value).map_err(|e| match e {
            FieldError::NoMatchingField => Error::Mapping {
                column: column.name.clone(),
                target: std::any::type_name::<T>(),
            },
            FieldError::Type(source) => Error::Type {
                column: column.name.clone(),
                source,
            },
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use sproc_types::FromSql;

    use super::*;
    use crate::row::ColumnSet;

    struct Account {
        id: i32,
        label: Option<String>,
    }

    // Non-trivial defaults so tests can tell "assigned" from "left alone".
    impl Default for Account {
        fn default() -> Self {
            Self {
                id: -1,
                label: Some("unset".to_string()),
            }
        }
    }

    impl RowTarget for Account {
        fn set_field(&mut self, column: &str, value: &SqlValue) -> Result<(), FieldError> {
            match column {
                "id" => self.id = FromSql::from_sql(value)?,
                "label" => self.label = FromSql::from_sql(value)?,
                _ => return Err(FieldError::NoMatchingField),
            }
            Ok(())
        }
    }

    fn row(values: Vec<SqlValue>) -> Row {
        Row::new(Arc::new(ColumnSet::from_names(&["id", "label"])), values)
    }

    #[test]
    fn test_populate_assigns_all_columns() {
        let mut account = Account::default();
        let r = row(vec![SqlValue::Int(7), SqlValue::String("main".into())]);
        populate_from_row(&mut account, &r, NullHandling::Assign).unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.label.as_deref(), Some("main"));
    }

    #[test]
    fn test_assign_mode_writes_null_through() {
        let mut account = Account::default();
        let r = row(vec![SqlValue::Int(7), SqlValue::Null]);
        populate_from_row(&mut account, &r, NullHandling::Assign).unwrap();
        assert_eq!(account.label, None);
    }

    #[test]
    fn test_skip_mode_leaves_default_on_null() {
        let mut account = Account::default();
        let r = row(vec![SqlValue::Int(7), SqlValue::Null]);
        populate_from_row(&mut account, &r, NullHandling::Skip).unwrap();
        assert_eq!(account.label.as_deref(), Some("unset"));
    }

    #[test]
    fn test_unknown_column_is_fatal() {
        let mut account = Account::default();
        let r = Row::new(
            Arc::new(ColumnSet::from_names(&["nope"])),
            vec![SqlValue::Int(1)],
        );
        let err = populate_from_row(&mut account, &r, NullHandling::Assign).unwrap_err();
        assert!(matches!(err, Error::Mapping { ref column, .. } if column == "nope"));
    }

    #[test]
    fn test_case_mismatch_is_unknown_column() {
        let mut account = Account::default();
        let r = Row::new(
            Arc::new(ColumnSet::from_names(&["Id"])),
            vec![SqlValue::Int(1)],
        );
        assert!(matches!(
            populate_from_row(&mut account, &r, NullHandling::Assign),
            Err(Error::Mapping { .. })
        ));
    }

    #[test]
    fn test_incompatible_value_is_type_error() {
        let mut account = Account::default();
        let r = row(vec![SqlValue::String("not an int".into()), SqlValue::Null]);
        let err = populate_from_row(&mut account, &r, NullHandling::Skip).unwrap_err();
        assert!(matches!(err, Error::Type { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_null_into_required_field_is_type_error() {
        let mut account = Account::default();
        let r = row(vec![SqlValue::Null, SqlValue::Null]);
        let err = populate_from_row(&mut account, &r, NullHandling::Assign).unwrap_err();
        assert!(matches!(err, Error::Type { ref column, .. } if column == "id"));
    }
}
