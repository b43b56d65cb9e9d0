//! SendNotificationUseCase: validates a phone notification and delivers it.
//!
//! The phone posts the notification it just received.  Only `message` is
//! mandatory; an empty `title` falls back to [`DEFAULT_TITLE`].  Delivery is
//! delegated to a [`Notifier`], which is a desktop integration in production
//! and a recording double in tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

/// Title shown when the phone sends none.
pub const DEFAULT_TITLE: &str = "Notification";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Message is required")]
    MissingMessage,

    /// The notifier failed; the reason is logged, never returned to the phone.
    #[error("Failed to send notification")]
    Delivery(String),
}

/// JSON body of `POST /notification`.  Absent fields deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationRequest {
    pub app_name: String,
    pub package_name: String,
    pub title: String,
    pub message: String,
}

/// A validated notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub app_name: String,
    pub package_name: String,
    pub title: String,
    pub message: String,
}

impl TryFrom<NotificationRequest> for Notification {
    type Error = NotificationError;

    fn try_from(req: NotificationRequest) -> Result<Self, Self::Error> {
        if req.message.is_empty() {
            return Err(NotificationError::MissingMessage);
        }
        let title = if req.title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            req.title
        };
        Ok(Self {
            app_name: req.app_name,
            package_name: req.package_name,
            title,
            message: req.message,
        })
    }
}

/// Delivers a notification to the desktop.
///
/// Infrastructure implementations talk to the notification daemon; test
/// implementations record calls.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), String>;
}

/// Validates requests and forwards them to the notifier.
#[derive(Clone)]
pub struct SendNotificationUseCase {
    notifier: Arc<dyn Notifier>,
}

impl SendNotificationUseCase {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Validates `request` and delivers it exactly once.
    ///
    /// # Errors
    ///
    /// - [`NotificationError::MissingMessage`] without calling the notifier.
    /// - [`NotificationError::Delivery`] if the notifier fails.
    pub async fn execute(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        let notification = Notification::try_from(request)?;
        match self.notifier.send(&notification).await {
            Ok(()) => {
                info!(app = %notification.app_name, "notification delivered");
                Ok(())
            }
            Err(reason) => {
                error!(app = %notification.app_name, "notification delivery failed: {reason}");
                Err(NotificationError::Delivery(reason))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
