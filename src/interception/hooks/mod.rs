//! Adapters for the two host request APIs
//!
//! - [`fetch`]: a promise-style call-issuing function. Matched calls get the
//!   full treatment: method, headers and body are relayed.
//! - [`open_send`]: an imperative object with separate `open` and `send`
//!   steps. Headers and body are committed after `open`, so only the URL can
//!   be substituted; everything else reaches the target as the host set it.
//!
//! Both share the matching and routing decision in
//! [`RequestRedirector`](crate::interception::redirector::RequestRedirector).

pub mod fetch;
pub mod open_send;

pub use fetch::{FetchApi, FetchOptions, FetchRequest, RedirectFetch};
pub use open_send::{
    OpenArgs, OpenSendRequest, RedirectingFactory, RedirectingRequest, RequestFactory,
};
