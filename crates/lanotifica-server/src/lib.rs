//! lanotifica-server: the relay that receives phone notifications.
//!
//! The binary in `main.rs` and the integration tests in `tests/` both build
//! on the modules below.

pub mod application;
pub mod infrastructure;
