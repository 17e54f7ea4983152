//! Domain types for the prover relay
//!
//! Plain data that flows between the interception ports: the operator's
//! redirect configuration, intercepted calls, the response shape handed back
//! to host APIs, and probe results.

pub mod call;
pub mod constants;
pub mod probe;
pub mod redirect_config;
pub mod types;

pub use call::*;
pub use probe::*;
pub use redirect_config::*;
pub use types::*;
