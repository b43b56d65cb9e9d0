//! Issuance and persistence of the self-signed certificate.
//!
//! [`load_or_create`] is the only entry point used at startup:
//!
//! 1. If `cert.pem` and `key.pem` both exist, they are loaded as-is.
//! 2. Otherwise a new P-256 key pair and certificate are issued, written to
//!    temporary siblings, renamed into place, and then loaded back through
//!    the same path as step 1.
//!
//! The round trip through disk in step 2 means the returned fingerprint is
//! always the fingerprint of the file a phone will actually be served.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{
    CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, SanType, SerialNumber,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use super::identity::Identity;
use crate::infrastructure::network::interfaces::local_ipv4_addrs;
use crate::infrastructure::storage::files::{
    create_config_dir, write_new_file, PRIVATE_FILE_MODE, PUBLIC_FILE_MODE,
};
use crate::infrastructure::storage::paths::ConfigPaths;

pub const COMMON_NAME: &str = "LaNotifica Server";
pub const ORGANIZATION: &str = "LaNotifica";
/// mDNS host name clients may use instead of an IP address.
pub const LOCAL_HOSTNAME: &str = "lanotifica.local";
pub const VALIDITY_YEARS: i32 = 10;
const SERIAL_BYTES: usize = 16;

/// Error type for certificate issuance and loading.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("failed to generate key pair: {0}")]
    KeyGeneration(String),

    #[error("failed to generate certificate serial number: {0}")]
    SerialGeneration(String),

    #[error("failed to create certificate: {0}")]
    Generation(String),

    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The persisted certificate could not be decoded for fingerprinting.
    #[error("certificate at {path} is not a valid PEM certificate: {reason}")]
    Fingerprint { path: PathBuf, reason: String },

    #[error("private key at {path} is not a valid PEM key: {reason}")]
    KeyParse { path: PathBuf, reason: String },

    /// The key file does not belong to the certificate file.
    #[error("private key {key_path} does not match certificate {cert_path}")]
    KeyMismatch { cert_path: PathBuf, key_path: PathBuf },
}

// ── Subject names ─────────────────────────────────────────────────────────────

/// Subject alternative names for a new certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectNames {
    pub ips: Vec<IpAddr>,
    pub dns: Vec<String>,
}

impl SubjectNames {
    /// Loopback, the given LAN addresses, `localhost` and `lanotifica.local`.
    pub fn with_lan_addrs(lan: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        let mut ips = vec![IpAddr::V4(Ipv4Addr::LOCALHOST)];
        for ip in lan {
            let ip = IpAddr::V4(ip);
            if !ip.is_loopback() && !ips.contains(&ip) {
                ips.push(ip);
            }
        }
        Self {
            ips,
            dns: vec!["localhost".to_string(), LOCAL_HOSTNAME.to_string()],
        }
    }

    /// Names for this host, using every non-loopback IPv4 interface address.
    pub fn discover() -> Self {
        Self::with_lan_addrs(local_ipv4_addrs())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Loads the persisted identity, issuing a new one if either file is missing.
///
/// # Errors
///
/// Issuance failures map to [`CertError::KeyGeneration`],
/// [`CertError::SerialGeneration`] or [`CertError::Generation`]; write
/// failures to [`CertError::Io`]; load failures as in [`Identity::load`].
pub fn load_or_create(paths: &ConfigPaths) -> Result<Identity, CertError> {
    load_or_create_with(paths, SubjectNames::discover)
}

/// Like [`load_or_create`] with an explicit source of subject names.
///
/// `names` is only called when a certificate has to be issued.
pub fn load_or_create_with(
    paths: &ConfigPaths,
    names: impl FnOnce() -> SubjectNames,
) -> Result<Identity, CertError> {
    if paths.cert_file().exists() && paths.key_file().exists() {
        debug!("loading existing certificate from {}", paths.cert_file().display());
        return Identity::load(paths);
    }

    let issued = issue(&names())?;
    persist(paths, &issued)?;
    info!("generated new self-signed certificate at {}", paths.cert_file().display());
    Identity::load(paths)
}

// ── Issuance ──────────────────────────────────────────────────────────────────

/// PEM text of a freshly issued certificate and its private key.
pub struct IssuedPem {
    pub cert_pem: String,
    pub key_pem: String,
}

/// Issues a self-signed P-256 server certificate valid for ten years.
pub fn issue(names: &SubjectNames) -> Result<IssuedPem, CertError> {
    let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)
        .map_err(|e| CertError::KeyGeneration(e.to_string()))?;

    let mut params = CertificateParams::default();
    params.serial_number = Some(random_serial()?);

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, COMMON_NAME);
    dn.push(DnType::OrganizationName, ORGANIZATION);
    params.distinguished_name = dn;

    let now = OffsetDateTime::now_utc();
    params.not_before = now;
    params.not_after = now
        .replace_year(now.year() + VALIDITY_YEARS)
        .unwrap_or_else(|_| now + Duration::days(3653));

    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyEncipherment,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

    for ip in &names.ips {
        params.subject_alt_names.push(SanType::IpAddress(*ip));
    }
    for dns in &names.dns {
        let name = dns
            .clone()
            .try_into()
            .map_err(|e: rcgen::Error| CertError::Generation(e.to_string()))?;
        params.subject_alt_names.push(SanType::DnsName(name));
    }

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| CertError::Generation(e.to_string()))?;

    Ok(IssuedPem {
        cert_pem: cert.pem(),
        key_pem: key_pair.serialize_pem(),
    })
}

/// A 16-byte random serial with the top bit cleared so it encodes as a
/// non-negative DER integer.
fn random_serial() -> Result<SerialNumber, CertError> {
    let mut bytes = vec![0u8; SERIAL_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CertError::SerialGeneration(e.to_string()))?;
    bytes[0] &= 0x7f;
    Ok(SerialNumber::from(bytes))
}

// ── Persistence ───────────────────────────────────────────────────────────────

/// Writes both PEM files or neither.
///
/// Each file is first written to a `.tmp` sibling with its final mode.  Only
/// when both temporary files are complete are they renamed over the real
/// paths.  Any failure removes every file this call created.
fn persist(paths: &ConfigPaths, issued: &IssuedPem) -> Result<(), CertError> {
    create_config_dir(paths.dir()).map_err(|source| CertError::Io {
        path: paths.dir().to_path_buf(),
        source,
    })?;

    let cert_path = paths.cert_file();
    let key_path = paths.key_file();
    let cert_tmp = tmp_sibling(&cert_path);
    let key_tmp = tmp_sibling(&key_path);

    let result = stage_and_commit(&[
        (
            key_tmp.as_path(),
            key_path.as_path(),
            issued.key_pem.as_bytes(),
            PRIVATE_FILE_MODE,
        ),
        (
            cert_tmp.as_path(),
            cert_path.as_path(),
            issued.cert_pem.as_bytes(),
            PUBLIC_FILE_MODE,
        ),
    ]);

    if result.is_err() {
        remove_if_present(&cert_tmp);
        remove_if_present(&key_tmp);
    }
    result
}

type StagedFile<'a> = (&'a Path, &'a Path, &'a [u8], u32);

fn stage_and_commit(files: &[StagedFile<'_>]) -> Result<(), CertError> {
    for &(tmp, _, contents, mode) in files {
        remove_if_present(tmp);
        write_new_file(tmp, contents, mode).map_err(|source| CertError::Io {
            path: tmp.to_path_buf(),
            source,
        })?;
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(files.len());
    for &(tmp, target, _, _) in files {
        if let Err(source) = std::fs::rename(tmp, target) {
            for done in committed {
                remove_if_present(done);
            }
            return Err(CertError::Io {
                path: target.to_path_buf(),
                source,
            });
        }
        committed.push(target);
    }
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn remove_if_present(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            debug!("could not remove {}: {e}", path.display());
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use lanotifica_core::FINGERPRINT_HEX_LEN;
    use x509_parser::extensions::GeneralName;
    use x509_parser::prelude::{FromDer, X509Certificate};

    fn temp_paths() -> (tempfile::TempDir, ConfigPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(dir.path().join("lanotifica"));
        (dir, paths)
    }

    fn fixed_names() -> SubjectNames {
        SubjectNames::with_lan_addrs([Ipv4Addr::new(192, 168, 1, 50)])
    }

    // ── Subject names ─────────────────────────────────────────────────────────

    #[test]
    fn test_subject_names_always_include_loopback_and_hostnames() {
        let names = SubjectNames::with_lan_addrs([
            Ipv4Addr::new(10, 0, 0, 2),
            Ipv4Addr::LOCALHOST,
            Ipv4Addr::new(10, 0, 0, 2),
        ]);

        assert_eq!(
            names.ips,
            vec![
                IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
            ]
        );
        assert_eq!(names.dns, vec!["localhost", "lanotifica.local"]);
    }

    // ── Issuance ──────────────────────────────────────────────────────────────

    #[test]
    fn test_issued_certificate_has_expected_fields() {
        // Arrange / Act
        let issued = issue(&fixed_names()).unwrap();
        let der = pem::parse(&issued.cert_pem).unwrap().contents().to_vec();
        let (_, cert) = X509Certificate::from_der(&der).unwrap();

        // Assert: self-signed server certificate
        assert_eq!(cert.subject().to_string(), cert.issuer().to_string());
        let subject = cert.subject().to_string();
        assert!(subject.contains("CN=LaNotifica Server"), "{subject}");
        assert!(subject.contains("O=LaNotifica"), "{subject}");

        let eku = cert.extended_key_usage().unwrap().unwrap().value;
        assert!(eku.server_auth);
        let ku = cert.key_usage().unwrap().unwrap().value;
        assert!(ku.digital_signature());
        assert!(ku.key_encipherment());

        let san = cert.subject_alternative_name().unwrap().unwrap().value;
        let dns: Vec<_> = san
            .general_names
            .iter()
            .filter_map(|n| match n {
                GeneralName::DNSName(d) => Some(*d),
                _ => None,
            })
            .collect();
        assert_eq!(dns, vec!["localhost", "lanotifica.local"]);
        let ips: Vec<_> = san
            .general_names
            .iter()
            .filter_map(|n| match n {
                GeneralName::IPAddress(ip) => Some(ip.to_vec()),
                _ => None,
            })
            .collect();
        assert!(ips.contains(&vec![127, 0, 0, 1]));
        assert!(ips.contains(&vec![192, 168, 1, 50]));

        // Roughly ten years of validity.
        let validity = cert.validity();
        let span = validity.not_after.timestamp() - validity.not_before.timestamp();
        assert!(span >= 3652 * 24 * 3600 && span <= 3654 * 24 * 3600, "{span}");
    }

    #[test]
    fn test_issued_serials_are_random_and_128_bit() {
        let a = issue(&fixed_names()).unwrap();
        let b = issue(&fixed_names()).unwrap();

        let serial = |pem_text: &str| {
            let der = pem::parse(pem_text).unwrap().contents().to_vec();
            let (_, cert) = X509Certificate::from_der(&der).unwrap();
            cert.raw_serial().to_vec()
        };

        let sa = serial(&a.cert_pem);
        assert_ne!(sa, serial(&b.cert_pem));
        assert!(sa.len() <= SERIAL_BYTES);
    }

    // ── load_or_create ────────────────────────────────────────────────────────

    #[test]
    fn test_first_run_writes_both_files_and_returns_hex_fingerprint() {
        // Arrange
        let (_guard, paths) = temp_paths();

        // Act
        let identity = load_or_create_with(&paths, fixed_names).unwrap();

        // Assert
        assert!(paths.cert_file().is_file());
        assert!(paths.key_file().is_file());
        let fp = identity.fingerprint().as_str();
        assert_eq!(fp.len(), FINGERPRINT_HEX_LEN);
        assert!(fp.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
    }

    #[test]
    fn test_fingerprint_is_hash_of_file_on_disk() {
        let (_guard, paths) = temp_paths();
        let identity = load_or_create_with(&paths, fixed_names).unwrap();

        let on_disk = std::fs::read_to_string(paths.cert_file()).unwrap();
        let der = pem::parse(on_disk).unwrap().contents().to_vec();

        assert_eq!(identity.fingerprint(), &lanotifica_core::Fingerprint::of_der(&der));
        assert_eq!(identity.cert_der(), der.as_slice());
        assert!(identity.trust_anchor().verify(&der).is_ok());
    }

    #[test]
    fn test_second_run_loads_without_rewriting() {
        // Arrange
        let (_guard, paths) = temp_paths();
        let first = load_or_create_with(&paths, fixed_names).unwrap();
        let cert_before = std::fs::read(paths.cert_file()).unwrap();
        let key_before = std::fs::read(paths.key_file()).unwrap();

        // Act
        let second = load_or_create_with(&paths, || panic!("must not reissue")).unwrap();

        // Assert
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(std::fs::read(paths.cert_file()).unwrap(), cert_before);
        assert_eq!(std::fs::read(paths.key_file()).unwrap(), key_before);
    }

    #[test]
    fn test_missing_key_triggers_reissue() {
        let (_guard, paths) = temp_paths();
        let first = load_or_create_with(&paths, fixed_names).unwrap();
        std::fs::remove_file(paths.key_file()).unwrap();

        let second = load_or_create_with(&paths, fixed_names).unwrap();

        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_invalid_certificate_pem_is_fingerprint_error() {
        // Arrange
        let (_guard, paths) = temp_paths();
        load_or_create_with(&paths, fixed_names).unwrap();
        std::fs::write(paths.cert_file(), "not a certificate").unwrap();

        // Act
        let result = load_or_create_with(&paths, fixed_names);

        // Assert
        assert!(matches!(result, Err(CertError::Fingerprint { .. })));
        assert_eq!(
            std::fs::read_to_string(paths.cert_file()).unwrap(),
            "not a certificate"
        );
    }

    #[test]
    fn test_key_pem_in_cert_slot_is_fingerprint_error() {
        let (_guard, paths) = temp_paths();
        load_or_create_with(&paths, fixed_names).unwrap();
        let key = std::fs::read(paths.key_file()).unwrap();
        std::fs::write(paths.cert_file(), key).unwrap();

        let result = Identity::load(&paths);

        assert!(matches!(result, Err(CertError::Fingerprint { .. })));
    }

    #[test]
    fn test_garbage_key_is_key_parse_error() {
        let (_guard, paths) = temp_paths();
        load_or_create_with(&paths, fixed_names).unwrap();
        std::fs::write(paths.key_file(), "garbage").unwrap();

        let result = Identity::load(&paths);

        assert!(matches!(result, Err(CertError::KeyParse { .. })));
    }

    #[test]
    fn test_key_from_other_identity_is_mismatch() {
        // Arrange: two independent identities
        let (_g1, a) = temp_paths();
        let (_g2, b) = temp_paths();
        load_or_create_with(&a, fixed_names).unwrap();
        load_or_create_with(&b, fixed_names).unwrap();
        std::fs::copy(b.key_file(), a.key_file()).unwrap();

        // Act
        let result = load_or_create_with(&a, fixed_names);

        // Assert
        assert!(matches!(result, Err(CertError::KeyMismatch { .. })));
    }

    #[test]
    fn test_failed_commit_leaves_no_partial_state() {
        // Arrange: a directory squats on the certificate path
        let (_guard, paths) = temp_paths();
        std::fs::create_dir_all(paths.cert_file()).unwrap();

        // Act
        let result = load_or_create_with(&paths, fixed_names);

        // Assert
        assert!(matches!(result, Err(CertError::Io { .. })));
        assert!(!paths.key_file().exists());
        assert!(!tmp_sibling(&paths.key_file()).exists());
        assert!(!tmp_sibling(&paths.cert_file()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_modes_are_public_cert_and_private_key() {
        use std::os::unix::fs::PermissionsExt;

        let (_guard, paths) = temp_paths();
        load_or_create_with(&paths, fixed_names).unwrap();

        let mode = |p: PathBuf| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(paths.cert_file()), 0o644);
        assert_eq!(mode(paths.key_file()), 0o600);
    }

    #[test]
    fn test_identity_debug_does_not_expose_key() {
        let (_guard, paths) = temp_paths();
        let identity = load_or_create_with(&paths, fixed_names).unwrap();

        let debug = format!("{identity:?}");

        assert!(!debug.contains("PRIVATE KEY"));
        assert!(debug.contains(identity.fingerprint().as_str()));
    }
}
