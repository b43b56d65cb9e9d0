//! TLS listener for the router.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tracing::info;

use crate::infrastructure::tls::Identity;

/// Serves `router` over HTTPS with `identity` until `handle` is shut down.
///
/// # Errors
///
/// Returns an error if the identity cannot be loaded into rustls or the
/// socket cannot be bound.
pub async fn serve(
    addr: SocketAddr,
    identity: &Identity,
    router: Router,
    handle: Handle,
) -> io::Result<()> {
    let tls = RustlsConfig::from_pem(
        identity.cert_pem().as_bytes().to_vec(),
        identity.key_pem().as_bytes().to_vec(),
    )
    .await?;

    info!("listening on https://{addr}");
    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(router.into_make_service())
        .await
}
