//! HTTPS surface of the relay.
//!
//! | Route           | Method | Auth   | Purpose                              |
//! |-----------------|--------|--------|--------------------------------------|
//! | `/`             | GET    | none   | pairing page with the QR code        |
//! | `/health`       | GET    | none   | liveness probe                       |
//! | `/notification` | POST   | bearer | forward one notification             |
//!
//! Handlers are thin: they decode the request, call the application layer,
//! and map its result onto a status code.

pub mod auth;
pub mod home;
pub mod routes;
pub mod server;

pub use routes::{build_router, HttpState, HttpTimeouts};
pub use server::serve;
