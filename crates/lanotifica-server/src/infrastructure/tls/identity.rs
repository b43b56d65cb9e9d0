//! Loading a persisted identity back from disk.

use std::fmt;
use std::path::Path;

use lanotifica_core::{Fingerprint, TrustAnchor};
use rcgen::KeyPair;
use tracing::warn;
use x509_parser::prelude::{FromDer, X509Certificate};

use super::cert::CertError;
use crate::infrastructure::storage::paths::ConfigPaths;

const CERTIFICATE_PEM_TAG: &str = "CERTIFICATE";

/// The key pair, certificate and fingerprint the relay serves with.
///
/// Always produced by [`Identity::load`], so the fingerprint is computed
/// from the certificate bytes on disk rather than from anything held in
/// memory during issuance.
#[derive(Clone)]
pub struct Identity {
    cert_pem: String,
    key_pem: String,
    cert_der: Vec<u8>,
    fingerprint: Fingerprint,
}

impl Identity {
    /// Reads `cert.pem` and `key.pem` and checks that they belong together.
    ///
    /// # Errors
    ///
    /// - [`CertError::Io`] if either file cannot be read.
    /// - [`CertError::Fingerprint`] if the certificate is not a PEM-wrapped
    ///   X.509 certificate.
    /// - [`CertError::KeyParse`] if the key is not a PEM private key.
    /// - [`CertError::KeyMismatch`] if the key does not match the
    ///   certificate's public key.
    pub fn load(paths: &ConfigPaths) -> Result<Self, CertError> {
        let cert_path = paths.cert_file();
        let key_path = paths.key_file();

        let cert_pem = read_to_string(&cert_path)?;
        let key_pem = read_to_string(&key_path)?;

        let block = pem::parse(&cert_pem).map_err(|e| CertError::Fingerprint {
            path: cert_path.clone(),
            reason: e.to_string(),
        })?;
        if block.tag() != CERTIFICATE_PEM_TAG {
            return Err(CertError::Fingerprint {
                path: cert_path,
                reason: format!("expected a {CERTIFICATE_PEM_TAG} block, found {}", block.tag()),
            });
        }
        let cert_der = block.contents().to_vec();

        let (_, x509) = X509Certificate::from_der(&cert_der).map_err(|e| CertError::Fingerprint {
            path: cert_path.clone(),
            reason: e.to_string(),
        })?;

        let key_pair = KeyPair::from_pem(&key_pem).map_err(|e| CertError::KeyParse {
            path: key_path.clone(),
            reason: e.to_string(),
        })?;

        if x509.public_key().subject_public_key.data.as_ref() != key_pair.public_key_raw() {
            return Err(CertError::KeyMismatch {
                cert_path,
                key_path,
            });
        }

        if !x509.validity().is_valid() {
            warn!(
                "certificate at {} is outside its validity window; delete cert.pem and key.pem to reissue",
                cert_path.display()
            );
        }

        let fingerprint = Fingerprint::of_der(&cert_der);
        Ok(Self {
            cert_pem,
            key_pem,
            cert_der,
            fingerprint,
        })
    }

    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    pub fn key_pem(&self) -> &str {
        &self.key_pem
    }

    pub fn cert_der(&self) -> &[u8] {
        &self.cert_der
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// The pin a freshly paired phone holds for this identity.
    pub fn trust_anchor(&self) -> TrustAnchor {
        TrustAnchor::pin(self.fingerprint.clone())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("fingerprint", &self.fingerprint)
            .field("cert_der_len", &self.cert_der.len())
            .finish_non_exhaustive()
    }
}

fn read_to_string(path: &Path) -> Result<String, CertError> {
    std::fs::read_to_string(path).map_err(|source| CertError::Io {
        path: path.to_path_buf(),
        source,
    })
}
