//! Infrastructure layer
//!
//! Concrete implementations of the interception ports: configuration
//! persistence, operator notifications and the privileged HTTP transport.

pub mod config_store;
pub mod log_messages;
pub mod notifier;
pub mod transport;

pub use config_store::{
    JsonFileKeyValueStore, KeyValueStore, MemoryConfigProvider, MemoryKeyValueStore,
    StoredConfigProvider,
};
pub use notifier::{MemoryNotifier, Notification, TracingNotifier};
pub use transport::ReqwestTransport;
