//! Local network integration: interface enumeration and mDNS advertisement.

pub mod discovery;
pub mod interfaces;
