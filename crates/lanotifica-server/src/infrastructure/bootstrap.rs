//! Startup sequence shared by the binary and the integration tests.
//!
//! Order matters and every step before the pairing image is fatal:
//!
//! 1. Load (or create) `config.json`.
//! 2. Load (or issue) the TLS identity.
//! 3. Render the pairing QR from the two.  A rendering failure leaves an
//!    empty image and startup continues.

use lanotifica_core::{build_pairing_image, PairingPayload};
use thiserror::Error;
use tracing::info;

use super::storage::config::{load_config, Config, ConfigError};
use super::storage::paths::ConfigPaths;
use super::tls::{self, CertError, Identity};
use crate::application::authenticate::AuthGate;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load or create certificate: {0}")]
    Certificate(#[from] CertError),
}

/// Everything loaded once at startup and read-only afterwards.
#[derive(Debug)]
pub struct ServerContext {
    pub paths: ConfigPaths,
    pub config: Config,
    pub identity: Identity,
    /// PNG of the pairing QR; empty if rendering failed.
    pub pairing_image: Vec<u8>,
}

impl ServerContext {
    pub fn bootstrap(paths: ConfigPaths) -> Result<Self, BootstrapError> {
        let config = load_config(&paths)?;
        info!("config loaded from {}", paths.config_file().display());

        let identity = tls::load_or_create(&paths)?;
        info!("certificate fingerprint: {}", identity.fingerprint());

        let pairing_image = build_pairing_image(&config.secret, identity.fingerprint());

        Ok(Self {
            paths,
            config,
            identity,
            pairing_image,
        })
    }

    /// The payload encoded in [`pairing_image`](Self::pairing_image).
    pub fn pairing_payload(&self) -> PairingPayload {
        PairingPayload::new(&self.config.secret, self.identity.fingerprint())
    }

    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.config.secret.clone())
    }
}
