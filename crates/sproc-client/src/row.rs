//! Row representation for result sets.
//!
//! A [`Row`] pairs shared column metadata with one value per column. Column
//! metadata is behind an `Arc` so every row of a result set shares a single
//! allocation.
//!
//! Name lookup is an exact, case-sensitive string match. This is a contract,
//! not an accident: mapping treats `UserId` and `userid` as different
//! columns, and callers must author column and field names identically.

use std::sync::Arc;

use sproc_types::{FromSql, SqlValue, TypeError};

/// Column metadata describing one result-set column.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column index (0-based).
    pub index: usize,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Shared column metadata for a result set.
///
/// Shared across all rows in the result set to avoid duplicating metadata
/// per row.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Arc<[Column]>,
}

impl ColumnSet {
    /// Create new column metadata from a list of columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    /// Create column metadata from names, indexed in order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Column::new(n.as_ref(), i))
                .collect(),
        )
    }

    /// Get the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find a column index by exact name match.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// All columns, in result-set order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// A row from a result set.
#[derive(Debug, Clone)]
pub struct Row {
    /// Column metadata (shared across the result set).
    columns: Arc<ColumnSet>,
    /// One value per column, in column order.
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a row from shared metadata and values.
    ///
    /// `values` must carry exactly one entry per column, in column order.
    pub fn new(columns: Arc<ColumnSet>, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Get the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the column metadata.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        self.columns.columns()
    }

    /// Get the shared column metadata.
    #[must_use]
    pub fn column_set(&self) -> &Arc<ColumnSet> {
        &self.columns
    }

    /// Get the raw value at a column index.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Check if a column value is NULL. Out-of-range indices read as NULL.
    #[must_use]
    pub fn is_null(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(SqlValue::is_null)
    }

    /// Get a value by column index with type conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the value cannot be
    /// converted to `T`.
    pub fn get<T: FromSql>(&self, index: usize) -> Result<T, TypeError> {
        let value = self.values.get(index).ok_or_else(|| TypeError::TypeMismatch {
            expected: "valid column index",
            actual: format!("index {index} out of bounds"),
        })?;
        T::from_sql(value)
    }

    /// Get a value by exact column name with type conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if no column has this name or the value cannot be
    /// converted to `T`.
    pub fn get_by_name<T: FromSql>(&self, name: &str) -> Result<T, TypeError> {
        let index = self.columns.position(name).ok_or_else(|| TypeError::TypeMismatch {
            expected: "valid column name",
            actual: format!("column '{name}' not found"),
        })?;
        self.get(index)
    }
}
