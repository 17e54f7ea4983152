//! Interception engine
//!
//! Calls to the well-known proving endpoint are recognised by
//! [`EndpointMatcher`], routed by [`RequestRedirector`] and, through the two
//! host hooks installed by [`DualHookInstaller`], either passed through or
//! relayed to the operator's target. [`HealthProber`] checks that target's
//! readiness endpoint independently of any intercepted call.

pub mod error;
pub mod hooks;
pub mod installer;
pub mod matcher;
pub mod ports;
pub mod prober;
pub mod redirector;
pub mod scheduler;

pub use error::{HostRequestError, RedirectError};
pub use installer::{DualHookInstaller, HostApis, UninstallHandle};
pub use matcher::EndpointMatcher;
pub use ports::{
    ConfigProvider, Notifier, PrivilegedTransport, RelayBody, StoreError, TransportError,
    TransportRequest, TransportResponse,
};
pub use prober::{generate_ready_url, HealthProber, ProbeOptions};
pub use redirector::{synthesize_response, RequestRedirector, Route};
pub use scheduler::{ProbeScheduler, ProbeTrigger};
