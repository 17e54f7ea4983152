//! Property-based tests for matching, header merging and readiness URLs

use http::header::{ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use proptest::prelude::*;
use prover_relay::domain::constants::WELL_KNOWN_SOURCE_ADDRESS;
use prover_relay::domain::{excerpt, RedirectConfig, UserAgent};
use prover_relay::infrastructure::{MemoryConfigProvider, MemoryNotifier, ReqwestTransport};
use prover_relay::interception::{generate_ready_url, EndpointMatcher, RequestRedirector};
use std::sync::Arc;

pub mod generators {
    use super::*;
    use proptest::string::string_regex;

    /// Printable ASCII that is always a valid header value
    pub fn header_value() -> impl Strategy<Value = String> {
        string_regex("[a-zA-Z0-9/*;=.+ -]{1,40}").unwrap()
    }

    pub fn host() -> impl Strategy<Value = String> {
        string_regex("[a-z][a-z0-9]{0,15}(\\.[a-z]{2,6}){1,2}").unwrap()
    }

    pub fn path() -> impl Strategy<Value = String> {
        string_regex("(/[a-z0-9_-]{1,10}){0,4}").unwrap()
    }
}

fn redirector() -> RequestRedirector {
    RequestRedirector::new(
        EndpointMatcher::default(),
        Arc::new(MemoryConfigProvider::new(RedirectConfig::default())),
        Arc::new(ReqwestTransport::new()),
        Arc::new(MemoryNotifier::new()),
        &UserAgent::try_new("prover-relay-test/1.0".to_string()).unwrap(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_only_the_literal_source_matches(url in ".*") {
        let matcher = EndpointMatcher::default();
        prop_assert_eq!(matcher.matches(&url), url == WELL_KNOWN_SOURCE_ADDRESS);
    }

    #[test]
    fn prop_suffixed_source_never_matches(suffix in ".+") {
        let matcher = EndpointMatcher::default();
        let url = format!("{WELL_KNOWN_SOURCE_ADDRESS}{suffix}");
        prop_assert!(!matcher.matches(&url));
    }

    #[test]
    fn prop_caller_accept_overrides_default(accept in generators::header_value()) {
        let mut original = HeaderMap::new();
        original.insert(ACCEPT, HeaderValue::from_str(&accept).unwrap());

        let headers = redirector().relay_headers(&original);
        prop_assert_eq!(headers.get_all(ACCEPT).iter().count(), 1);
        prop_assert_eq!(headers[ACCEPT].to_str().unwrap(), accept.as_str());
        prop_assert_eq!(headers.get_all(USER_AGENT).iter().count(), 1);
    }

    #[test]
    fn prop_caller_user_agent_overrides_default(agent in generators::header_value()) {
        let mut original = HeaderMap::new();
        original.insert(USER_AGENT, HeaderValue::from_str(&agent).unwrap());

        let headers = redirector().relay_headers(&original);
        prop_assert_eq!(headers.get_all(USER_AGENT).iter().count(), 1);
        prop_assert_eq!(headers[USER_AGENT].to_str().unwrap(), agent.as_str());
        prop_assert_eq!(headers[ACCEPT].to_str().unwrap(), "*/*");
    }

    #[test]
    fn prop_ready_url_keeps_origin(
        secure in any::<bool>(),
        host in generators::host(),
        port in proptest::option::of(1024u16..65535),
        path in generators::path(),
    ) {
        let scheme = if secure { "https" } else { "http" };
        let authority = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.clone(),
        };
        let target = format!("{scheme}://{authority}{path}");

        let ready = generate_ready_url(&target).unwrap();
        prop_assert_eq!(ready.scheme(), scheme);
        prop_assert_eq!(ready.host_str(), Some(host.as_str()));
        prop_assert_eq!(ready.path(), "/ready");
    }

    #[test]
    fn prop_excerpt_is_a_bounded_prefix(text in ".*", max in 0usize..300) {
        let cut = excerpt(&text, max);
        prop_assert!(cut.chars().count() <= max);
        prop_assert!(text.starts_with(&cut));
    }
}
