//! Application services
//!
//! Lifecycle glue between the interception engine, its ports and the
//! operator-facing operations (saving configuration, testing the target).

pub mod app;

pub use app::Application;
