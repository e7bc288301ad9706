//! # sproc-testing
//!
//! Test infrastructure for the sproc mapper.
//!
//! The centerpiece is [`MockExecutor`], a scripted, thread-safe
//! implementation of the executor seam: canned responses per procedure
//! name, output-parameter values, connection-failure injection, and
//! open/close accounting so tests can assert that no session leaks.
//!
//! This crate is `publish = false`; it also hosts the behavior-level test
//! suite that drives `sproc-client` end to end (kept here rather than as a
//! dev-dependency of the client crate, which would be circular).

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod mock_executor;

pub use mock_executor::{BoundParam, MockExecutor, MockExecutorBuilder, MockResponse};
