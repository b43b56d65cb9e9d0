//! Notification delivery backends.
//!
//! The relay ships with [`LogNotifier`], which records each notification
//! through `tracing`.  A desktop integration implements the same
//! [`Notifier`] trait and is swapped in at bootstrap.

use async_trait::async_trait;
use tracing::info;

use crate::application::send_notification::{Notification, Notifier};

/// Writes each notification to the log at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), String> {
        info!(
            app = %notification.app_name,
            package = %notification.package_name,
            title = %notification.title,
            "{}",
            notification.message
        );
        Ok(())
    }
}
