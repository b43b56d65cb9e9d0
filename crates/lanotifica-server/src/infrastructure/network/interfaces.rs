//! Enumeration of the host's IPv4 addresses.
//!
//! Used to fill the certificate's subject alternative names, so a phone that
//! reaches the relay by any LAN address still sees a matching certificate.

use std::net::Ipv4Addr;

use tracing::warn;

/// Every non-loopback IPv4 address on an interface that is up.
///
/// Enumeration failure is not an error for the caller: the certificate is
/// still issued with the loopback and hostname entries only.
pub fn local_ipv4_addrs() -> Vec<Ipv4Addr> {
    match get_if_addrs::get_if_addrs() {
        Ok(ifaces) => collect_ipv4(ifaces.iter().map(|iface| (iface.is_loopback(), iface.ip()))),
        Err(e) => {
            warn!("could not enumerate network interfaces: {e}");
            Vec::new()
        }
    }
}

fn collect_ipv4(addrs: impl Iterator<Item = (bool, std::net::IpAddr)>) -> Vec<Ipv4Addr> {
    let mut out: Vec<Ipv4Addr> = addrs
        .filter_map(|(loopback, ip)| match ip {
            std::net::IpAddr::V4(v4) if !loopback && !v4.is_loopback() => Some(v4),
            _ => None,
        })
        .collect();
    out.sort();
    out.dedup();
    out
}
