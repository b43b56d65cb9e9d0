//! Infrastructure layer: everything that touches the OS.
//!
//! - **`storage`** – config directory, `config.json`, permission-aware writes.
//! - **`tls`** – self-signed identity issuance and loading.
//! - **`network`** – interface enumeration and mDNS advertisement.
//! - **`http`** – axum router and the TLS listener.
//! - **`notify`** – notification delivery backends.
//! - **`bootstrap`** – the startup sequence tying the above together.

pub mod bootstrap;
pub mod http;
pub mod network;
pub mod notify;
pub mod storage;
pub mod tls;
