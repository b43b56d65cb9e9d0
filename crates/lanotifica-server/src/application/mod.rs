//! Application layer use cases for the relay.
//!
//! # What lives here? (for beginners)
//!
//! This layer holds the request-level rules that do not care how a request
//! arrived.  Nothing in here opens a socket, reads a file, or talks to the
//! desktop.  Collaborators are reached through traits so tests can record
//! what happened instead of producing real side effects.
//!
//! # Sub-modules
//!
//! - **`authenticate`** – [`AuthGate`](authenticate::AuthGate), the bearer
//!   check applied to every relay request before it reaches a handler.
//!
//! - **`send_notification`** – validates an incoming notification and hands
//!   it to a [`Notifier`](send_notification::Notifier).

pub mod authenticate;
pub mod send_notification;
