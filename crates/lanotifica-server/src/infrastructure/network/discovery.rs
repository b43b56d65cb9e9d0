//! Best-effort mDNS advertisement of the relay on the local network.
//!
//! The phone browses for `_lanotifica._tcp` to find the relay without the
//! user typing an IP address.  Discovery is a convenience only: when the host
//! has no multicast capability the relay keeps running and the user falls
//! back to manual entry.  None of the failures in this module are fatal.
//!
//! # Lifecycle
//!
//! ```text
//! start_or_disabled(port) ──► running ──stop()──► stopped
//!          │                                 ▲
//!          └── responder failed ──► disabled ┘ (stop() is a no-op)
//! ```
//!
//! `stop()` may be called any number of times.  Dropping a running
//! advertiser stops it.

use mdns_sd::{ServiceDaemon, ServiceInfo};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Instance name published in the service record.
pub const INSTANCE_NAME: &str = "lanotifica";
/// Fully qualified DNS-SD service type.
pub const SERVICE_TYPE: &str = "_lanotifica._tcp.local.";
pub const TXT_DESCRIPTION_KEY: &str = "description";
pub const TXT_DESCRIPTION: &str = "LaNotifica notification forwarder";

/// Host name used when the system host name cannot be read.
const FALLBACK_HOST: &str = "lanotifica";

/// Non-fatal discovery failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryWarning {
    /// The multicast responder could not be created.
    #[error("mDNS responder unavailable: {0}")]
    ResponderUnavailable(String),

    #[error("failed to publish mDNS service: {0}")]
    PublishFailed(String),

    #[error("failed to shut down mDNS responder: {0}")]
    ShutdownFailed(String),
}

/// What is advertised.  Exists only while an advertiser is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub instance_name: String,
    pub service_type: String,
    pub port: u16,
    pub description: String,
}

impl ServiceRecord {
    pub fn for_port(port: u16) -> Self {
        Self {
            instance_name: INSTANCE_NAME.to_string(),
            service_type: SERVICE_TYPE.to_string(),
            port,
            description: TXT_DESCRIPTION.to_string(),
        }
    }
}

// ── Responder seam ────────────────────────────────────────────────────────────

/// A multicast DNS responder that can publish one record and shut down.
#[cfg_attr(test, mockall::automock)]
pub trait Responder: Send {
    fn publish(&mut self, record: &ServiceRecord) -> Result<(), DiscoveryWarning>;
    fn shutdown(&mut self) -> Result<(), DiscoveryWarning>;
}

/// [`Responder`] backed by the `mdns-sd` daemon thread.
pub struct MdnsResponder {
    daemon: ServiceDaemon,
    registered: Option<String>,
}

impl MdnsResponder {
    /// Starts the responder thread and binds the multicast sockets.
    pub fn new() -> Result<Self, DiscoveryWarning> {
        let daemon =
            ServiceDaemon::new().map_err(|e| DiscoveryWarning::ResponderUnavailable(e.to_string()))?;
        Ok(Self {
            daemon,
            registered: None,
        })
    }

    /// [`MdnsResponder::new`], boxed for [`ServiceAdvertiser::start_with`].
    pub fn boxed() -> Result<Box<dyn Responder>, DiscoveryWarning> {
        Ok(Box::new(Self::new()?))
    }
}

impl Responder for MdnsResponder {
    fn publish(&mut self, record: &ServiceRecord) -> Result<(), DiscoveryWarning> {
        let properties = [(TXT_DESCRIPTION_KEY, record.description.as_str())];
        let info = ServiceInfo::new(
            &record.service_type,
            &record.instance_name,
            &mdns_host_name(),
            "",
            record.port,
            &properties[..],
        )
        .map_err(|e| DiscoveryWarning::PublishFailed(e.to_string()))?
        .enable_addr_auto();

        let fullname = info.get_fullname().to_string();
        self.daemon
            .register(info)
            .map_err(|e| DiscoveryWarning::PublishFailed(e.to_string()))?;
        self.registered = Some(fullname);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), DiscoveryWarning> {
        if let Some(fullname) = self.registered.take() {
            if let Err(e) = self.daemon.unregister(&fullname) {
                debug!("mDNS unregister of {fullname} failed: {e}");
            }
        }
        self.daemon
            .shutdown()
            .map(|_| ())
            .map_err(|e| DiscoveryWarning::ShutdownFailed(e.to_string()))
    }
}

/// The system host name as an mDNS host, e.g. `desk.local.`.
fn mdns_host_name() -> String {
    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_string());
    to_mdns_host(&host)
}

fn to_mdns_host(host: &str) -> String {
    let bare = host.trim_end_matches('.');
    let bare = bare.strip_suffix(".local").unwrap_or(bare);
    format!("{bare}.local.")
}

// ── Advertiser ────────────────────────────────────────────────────────────────

/// Owns the responder for as long as the service is advertised.
pub struct ServiceAdvertiser {
    responder: Option<Box<dyn Responder>>,
}

impl ServiceAdvertiser {
    /// An advertiser that advertises nothing.
    pub fn disabled() -> Self {
        Self { responder: None }
    }

    /// Publishes the relay on `port` using the system mDNS responder.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryWarning`] the caller is expected to log and
    /// otherwise ignore.
    pub fn start(port: u16) -> Result<Self, DiscoveryWarning> {
        Self::start_with(MdnsResponder::boxed, port)
    }

    /// Publishes using a responder produced by `factory`.
    ///
    /// If publishing fails the responder is shut down before returning.
    pub fn start_with<F>(factory: F, port: u16) -> Result<Self, DiscoveryWarning>
    where
        F: FnOnce() -> Result<Box<dyn Responder>, DiscoveryWarning>,
    {
        let mut responder = factory()?;
        let record = ServiceRecord::for_port(port);
        if let Err(warning) = responder.publish(&record) {
            if let Err(e) = responder.shutdown() {
                debug!("cleanup after failed publish: {e}");
            }
            return Err(warning);
        }
        info!(
            "advertising {}.{} on port {}",
            record.instance_name, record.service_type, record.port
        );
        Ok(Self {
            responder: Some(responder),
        })
    }

    /// [`start`](Self::start), degrading to [`disabled`](Self::disabled)
    /// with a warning on failure.
    pub fn start_or_disabled(port: u16) -> Self {
        Self::start_or_disabled_with(MdnsResponder::boxed, port)
    }

    pub fn start_or_disabled_with<F>(factory: F, port: u16) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Responder>, DiscoveryWarning>,
    {
        match Self::start_with(factory, port) {
            Ok(advertiser) => advertiser,
            Err(warning) => {
                warn!("{warning}; continuing without local discovery");
                Self::disabled()
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.responder.is_some()
    }

    /// Withdraws the advertisement and releases the responder.
    ///
    /// A no-op when the advertiser never started or was already stopped.
    pub fn stop(&mut self) {
        if let Some(mut responder) = self.responder.take() {
            match responder.shutdown() {
                Ok(()) => info!("mDNS advertisement stopped"),
                Err(warning) => warn!("{warning}"),
            }
        }
    }
}

impl Drop for ServiceAdvertiser {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
