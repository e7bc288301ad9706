//! End-to-end mapper walkthrough against the mock executor.
//!
//! This example scripts a couple of stored procedures, drives every call
//! shape through the mapper, and prints the results. No database required.
//!
//! # Running
//!
//! ```bash
//! cargo run -p sproc-testing --example mapped_call
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use sproc_client::{Mapper, Parameter, SqlValue};
use sproc_derive::RowTarget;
use sproc_testing::{MockExecutor, MockResponse};

#[derive(Debug, Default, RowTarget)]
struct Order {
    id: i32,
    customer: String,
    note: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let executor = MockExecutor::builder()
        .with_procedure(
            "GetOpenOrders",
            MockResponse::rows(
                &["id", "customer", "note"],
                vec![
                    vec![
                        SqlValue::Int(1001),
                        SqlValue::String("Contoso".into()),
                        SqlValue::String("rush".into()),
                    ],
                    vec![
                        SqlValue::Int(1002),
                        SqlValue::String("Fabrikam".into()),
                        SqlValue::Null,
                    ],
                ],
            ),
        )
        .with_procedure("CloseOrder", MockResponse::rows_affected(1))
        .with_output("CloseOrder", "closed_at_id", SqlValue::Int(1001))
        .build();

    let mut mapper = Mapper::new(executor.clone(), "mock://orders");

    // List mode: one instance per row, NULL columns skipped.
    let orders: Vec<Order> = mapper.execute_list("GetOpenOrders")?;
    for order in &orders {
        println!("open order {} for {} ({:?})", order.id, order.customer, order.note);
    }

    // Single mode: first row only, NULL columns assigned.
    let first: Order = mapper.execute_single("GetOpenOrders")?;
    println!("first open order: {first:?}");

    // Non-query with an output parameter.
    let affected = mapper.execute_non_query(
        "CloseOrder",
        &[
            Parameter::input("id", &1001i32)?,
            Parameter::output("closed_at_id"),
        ],
    )?;
    println!("closed {affected} order(s)");
    for output in mapper.output_parameters() {
        println!("output {} = {}", output.name, output.value);
    }

    // Every call opened and closed its own session.
    println!(
        "sessions opened: {}, closed: {}",
        executor.opened(),
        executor.closed()
    );

    Ok(())
}
