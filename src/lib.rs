//! Prover relay - redirection of proving calls to an operator-chosen prover
//!
//! Calls addressed to the well-known proving endpoint are intercepted at the
//! host's two request APIs and either passed through untouched or relayed to
//! an alternate target over a privileged transport. A readiness prober checks
//! that target and reports to the operator.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interception;

#[cfg(test)]
pub(crate) mod test_utils;

pub use application::Application;
pub use error::{Error, Result};
