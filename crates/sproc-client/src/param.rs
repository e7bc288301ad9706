//! Stored-procedure parameters.
//!
//! A [`Parameter`] is a named value passed to a stored procedure. Names are
//! stored without any marker prefix; the mapper applies the executor's
//! marker convention at bind time, so callers write `total`, never `@total`.

use sproc_types::{SqlValue, ToSql, TypeError};

/// The direction a parameter's value travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDirection {
    /// Caller-supplied value, read by the procedure.
    Input,
    /// Procedure-supplied value, read back after execution.
    Output,
    /// Both: the caller supplies a value and the procedure may replace it.
    InputOutput,
    /// The procedure's return value.
    ReturnValue,
}

impl ParamDirection {
    /// Check whether this direction carries a value back after execution.
    #[must_use]
    pub fn receives_value(&self) -> bool {
        !matches!(self, Self::Input)
    }
}

/// A named stored-procedure parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name, without marker prefix.
    pub name: String,
    /// Direction the value travels.
    pub direction: ParamDirection,
    /// Parameter value. For output-only parameters this is
    /// [`SqlValue::Null`] until the executor fills it in.
    pub value: SqlValue,
}

impl Parameter {
    /// Create an input parameter from an already-converted value.
    pub fn new(name: impl Into<String>, value: SqlValue) -> Self {
        Self {
            name: name.into(),
            direction: ParamDirection::Input,
            value,
        }
    }

    /// Create an input parameter from a value implementing [`ToSql`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to a SQL value.
    pub fn input<T: ToSql + ?Sized>(name: impl Into<String>, value: &T) -> Result<Self, TypeError> {
        Ok(Self::new(name, value.to_sql()?))
    }

    /// Create an output parameter.
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: ParamDirection::Output,
            value: SqlValue::Null,
        }
    }

    /// Create an input/output parameter from a value implementing [`ToSql`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be converted to a SQL value.
    pub fn input_output<T: ToSql + ?Sized>(
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, TypeError> {
        Ok(Self {
            name: name.into(),
            direction: ParamDirection::InputOutput,
            value: value.to_sql()?,
        })
    }

    /// Create a return-value parameter.
    pub fn return_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: ParamDirection::ReturnValue,
            value: SqlValue::Null,
        }
    }
}

/// Trait for types that can be converted to a stored-procedure parameter
/// list.
///
/// This trait is typically implemented via the `#[derive(ToParams)]` macro
/// from `sproc-derive`, but can also be implemented manually.
///
/// # Example
///
/// ```rust,ignore
/// use sproc_client::{Parameter, ToParams};
/// use sproc_types::TypeError;
///
/// struct NewUser {
///     name: String,
///     email: String,
/// }
///
/// impl ToParams for NewUser {
///     fn to_params(&self) -> Result<Vec<Parameter>, TypeError> {
///         Ok(vec![
///             Parameter::input("name", &self.name)?,
///             Parameter::input("email", &self.email)?,
///         ])
///     }
/// }
/// ```
pub trait ToParams {
    /// Convert this value to a list of input parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any field value cannot be converted to a SQL
    /// value.
    fn to_params(&self) -> Result<Vec<Parameter>, TypeError>;

    /// Get the number of parameters this value produces.
    ///
    /// Returns `None` if the count is dynamic.
    fn param_count(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parameter() {
        let p = Parameter::input("id", &42i32).unwrap();
        assert_eq!(p.name, "id");
        assert_eq!(p.direction, ParamDirection::Input);
        assert_eq!(p.value, SqlValue::Int(42));
    }

    #[test]
    fn test_output_parameter_starts_null() {
        let p = Parameter::output("total");
        assert_eq!(p.direction, ParamDirection::Output);
        assert!(p.value.is_null());
    }

    #[test]
    fn test_receives_value() {
        assert!(!ParamDirection::Input.receives_value());
        assert!(ParamDirection::Output.receives_value());
        assert!(ParamDirection::InputOutput.receives_value());
        assert!(ParamDirection::ReturnValue.receives_value());
    }

    #[test]
    fn test_to_params_manual_impl() {
        struct Probe {
            name: String,
            age: i32,
        }

        impl ToParams for Probe {
            fn to_params(&self) -> Result<Vec<Parameter>, TypeError> {
                Ok(vec![
                    Parameter::input("name", &self.name)?,
                    Parameter::input("age", &self.age)?,
                ])
            }

            fn param_count(&self) -> Option<usize> {
                Some(2)
            }
        }

        let probe = Probe {
            name: "Alice".to_string(),
            age: 30,
        };
        let params = probe.to_params().unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "name");
        assert_eq!(params[1].value, SqlValue::Int(30));
        assert_eq!(probe.param_count(), Some(2));
    }
}
