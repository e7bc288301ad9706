//! Derive macro coverage: generated `RowTarget` setter tables and
//! `ToParams` conversions, driven through the mapper and the mock executor.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sproc_client::{Error, Mapper, ParamDirection, SqlValue, ToParams};
use sproc_derive::{RowTarget, ToParams};
use sproc_testing::{MockExecutor, MockResponse};

#[derive(Debug, Default, RowTarget)]
struct User {
    id: i32,
    name: String,
    email: Option<String>,
}

#[derive(Debug, Default, RowTarget)]
#[sproc(rename_all = "PascalCase")]
struct Invoice {
    invoice_id: i64,
    #[sproc(rename = "GrandTotal")]
    total: f64,
    #[sproc(skip)]
    computed: String,
}

#[derive(ToParams)]
struct NewUser {
    name: String,
    #[sproc(rename = "email_address")]
    email: String,
    #[sproc(skip)]
    cached_display: String,
}

fn user_executor(rows: Vec<Vec<SqlValue>>) -> MockExecutor {
    MockExecutor::builder()
        .with_procedure("GetUsers", MockResponse::rows(&["id", "name", "email"], rows))
        .build()
}

#[test]
fn derived_row_target_maps_matching_columns() {
    let executor = user_executor(vec![vec![
        SqlValue::Int(1),
        SqlValue::String("Alice".into()),
        SqlValue::String("alice@example.com".into()),
    ]]);

    let mut mapper = Mapper::new(executor, "mock://");
    let users: Vec<User> = mapper.execute_list("GetUsers").unwrap();
    assert_eq!(users[0].id, 1);
    assert_eq!(users[0].name, "Alice");
    assert_eq!(users[0].email.as_deref(), Some("alice@example.com"));
}

#[test]
fn derived_row_target_is_case_sensitive() {
    let executor = MockExecutor::builder()
        .with_procedure(
            "GetUsers",
            MockResponse::rows(&["Id"], vec![vec![SqlValue::Int(1)]]),
        )
        .build();

    let mut mapper = Mapper::new(executor, "mock://");
    let err = mapper.execute_list::<User>("GetUsers").unwrap_err();
    assert!(matches!(err, Error::Mapping { ref column, .. } if column == "Id"));
}

#[test]
fn derived_option_field_handles_null_per_mode() {
    let rows = vec![vec![
        SqlValue::Int(1),
        SqlValue::String("Alice".into()),
        SqlValue::Null,
    ]];

    let mut mapper = Mapper::new(user_executor(rows.clone()), "mock://");
    let single: User = mapper.execute_single("GetUsers").unwrap();
    assert_eq!(single.email, None);

    let mut mapper = Mapper::new(user_executor(rows), "mock://");
    let listed: Vec<User> = mapper.execute_list("GetUsers").unwrap();
    // Default for Option is already None; the point is that list mode
    // tolerates the NULL without touching the field.
    assert_eq!(listed[0].email, None);
    assert_eq!(listed[0].name, "Alice");
}

#[test]
fn derived_null_into_required_field_fails_in_single_mode() {
    let rows = vec![vec![
        SqlValue::Int(1),
        SqlValue::Null,
        SqlValue::Null,
    ]];

    let mut mapper = Mapper::new(user_executor(rows), "mock://");
    let err = mapper.execute_single::<User>("GetUsers").unwrap_err();
    assert!(matches!(err, Error::Type { ref column, .. } if column == "name"));
}

#[test]
fn rename_all_and_rename_compose() {
    let executor = MockExecutor::builder()
        .with_procedure(
            "GetInvoices",
            MockResponse::rows(
                &["InvoiceId", "GrandTotal"],
                vec![vec![SqlValue::BigInt(900), SqlValue::Double(12.5)]],
            ),
        )
        .build();

    let mut mapper = Mapper::new(executor, "mock://");
    let invoices: Vec<Invoice> = mapper.execute_list("GetInvoices").unwrap();
    assert_eq!(invoices[0].invoice_id, 900);
    assert_eq!(invoices[0].total, 12.5);
    assert_eq!(invoices[0].computed, "");
}

#[test]
fn skipped_field_rejects_its_own_column() {
    // `computed` is skipped, so a column named "Computed" has no setter arm.
    let executor = MockExecutor::builder()
        .with_procedure(
            "GetInvoices",
            MockResponse::rows(
                &["InvoiceId", "GrandTotal", "Computed"],
                vec![vec![
                    SqlValue::BigInt(1),
                    SqlValue::Double(0.0),
                    SqlValue::String("x".into()),
                ]],
            ),
        )
        .build();

    let mut mapper = Mapper::new(executor, "mock://");
    let err = mapper.execute_list::<Invoice>("GetInvoices").unwrap_err();
    assert!(matches!(err, Error::Mapping { ref column, .. } if column == "Computed"));
}

#[test]
fn derived_to_params_produces_input_parameters() {
    let user = NewUser {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        cached_display: "Alice <alice@example.com>".to_string(),
    };

    let params = user.to_params().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(user.param_count(), Some(2));
    assert_eq!(params[0].name, "name");
    assert_eq!(params[0].direction, ParamDirection::Input);
    assert_eq!(params[1].name, "email_address");
    assert_eq!(params[1].value, SqlValue::String("alice@example.com".into()));
}

#[test]
fn derived_params_flow_through_a_call() {
    let executor = MockExecutor::builder()
        .with_procedure("InsertUser", MockResponse::rows_affected(1))
        .build();

    let user = NewUser {
        name: "Bob".to_string(),
        email: "bob@example.com".to_string(),
        cached_display: String::new(),
    };

    let mut mapper = Mapper::new(executor.clone(), "mock://");
    let affected = mapper
        .execute_non_query("InsertUser", &user.to_params().unwrap())
        .unwrap();
    assert_eq!(affected, 1);

    let bound = executor.last_bound();
    assert_eq!(bound.len(), 2);
    assert_eq!(bound[0].name, "@name");
    assert_eq!(bound[1].name, "@email_address");
}
