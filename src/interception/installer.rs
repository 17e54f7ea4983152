//! Installation of both host hooks
//!
//! The host hands its original request APIs to [`DualHookInstaller::install`]
//! and receives wrapped versions through the returned [`UninstallHandle`].
//! Installing twice never stacks a second wrapper: the installer remembers
//! what it installed, and an API that already carries the redirect marker is
//! used as-is.

use crate::infrastructure::log_messages::installer;
use crate::interception::hooks::{FetchApi, RedirectFetch, RedirectingFactory, RequestFactory};
use crate::interception::redirector::RequestRedirector;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// The pair of request APIs a host application issues calls through
#[derive(Clone)]
pub struct HostApis {
    pub fetch: Arc<dyn FetchApi>,
    pub requests: Arc<dyn RequestFactory>,
}

impl HostApis {
    pub fn new(fetch: Arc<dyn FetchApi>, requests: Arc<dyn RequestFactory>) -> Self {
        Self { fetch, requests }
    }
}

struct Installed {
    hooked: HostApis,
    originals: HostApis,
}

type InstallSlot = Arc<Mutex<Option<Installed>>>;

pub struct DualHookInstaller {
    redirector: Arc<RequestRedirector>,
    installed: InstallSlot,
}

impl DualHookInstaller {
    pub fn new(redirector: Arc<RequestRedirector>) -> Self {
        Self {
            redirector,
            installed: Arc::new(Mutex::new(None)),
        }
    }

    /// Wrap both host APIs, at most once.
    ///
    /// While an installation is active, further calls return handles to the
    /// same wrappers and ignore the APIs passed in.
    pub fn install(&self, host: HostApis) -> UninstallHandle {
        let mut slot = self.installed.lock();

        if let Some(existing) = slot.as_ref() {
            debug!("{}", installer::ALREADY_INSTALLED);
            return UninstallHandle {
                hooked: existing.hooked.clone(),
                newly_installed: false,
                slot: Arc::clone(&self.installed),
            };
        }

        let hooked = HostApis {
            fetch: self.wrap_fetch(Arc::clone(&host.fetch)),
            requests: self.wrap_requests(Arc::clone(&host.requests)),
        };
        *slot = Some(Installed {
            hooked: hooked.clone(),
            originals: host,
        });

        info!(
            source = %self.redirector.matcher().source(),
            "{}",
            installer::INSTALLED
        );

        UninstallHandle {
            hooked,
            newly_installed: true,
            slot: Arc::clone(&self.installed),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed.lock().is_some()
    }

    fn wrap_fetch(&self, fetch: Arc<dyn FetchApi>) -> Arc<dyn FetchApi> {
        if fetch.is_redirect_hook() {
            debug!(hook = "fetch", "{}", installer::ALREADY_WRAPPED);
            return fetch;
        }
        Arc::new(RedirectFetch::new(fetch, Arc::clone(&self.redirector)))
    }

    fn wrap_requests(&self, requests: Arc<dyn RequestFactory>) -> Arc<dyn RequestFactory> {
        if requests.is_redirect_hook() {
            debug!(hook = "open", "{}", installer::ALREADY_WRAPPED);
            return requests;
        }
        Arc::new(RedirectingFactory::new(
            requests,
            Arc::clone(&self.redirector),
        ))
    }
}

/// Access to the installed wrappers and the way back to the originals
pub struct UninstallHandle {
    hooked: HostApis,
    newly_installed: bool,
    slot: InstallSlot,
}

impl UninstallHandle {
    pub fn apis(&self) -> &HostApis {
        &self.hooked
    }

    pub fn fetch(&self) -> Arc<dyn FetchApi> {
        Arc::clone(&self.hooked.fetch)
    }

    pub fn requests(&self) -> Arc<dyn RequestFactory> {
        Arc::clone(&self.hooked.requests)
    }

    /// False when this handle came from a repeated `install`
    pub fn newly_installed(&self) -> bool {
        self.newly_installed
    }

    /// Remove the installation this handle refers to and return the
    /// original APIs. `None` if it was already removed.
    pub fn uninstall(self) -> Option<HostApis> {
        let mut slot = self.slot.lock();
        let is_current = slot
            .as_ref()
            .is_some_and(|installed| Arc::ptr_eq(&installed.hooked.fetch, &self.hooked.fetch));

        if !is_current {
            return None;
        }

        info!("{}", installer::UNINSTALLED);
        slot.take().map(|installed| installed.originals)
    }
}
