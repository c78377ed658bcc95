//! Unit and service tests for the task lifecycle engine.

mod harness;
mod service_tests;
