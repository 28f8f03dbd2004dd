//! Notification sink that writes to the tracing pipeline.
//!
//! Hosts without a toast layer (the demo binary, headless services) wire
//! this in so user-facing events still show up in structured logs.

use tracing::{info, warn};

use crate::domain::ports::{Notification, NotificationSink};

/// Emits each notification as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let message = notification.message();
        match notification {
            Notification::SaveFailed { .. } => {
                warn!(kind = notification.kind(), %message, "notification");
            }
            Notification::LocationSaved { .. } | Notification::SignInRequired => {
                info!(kind = notification.kind(), %message, "notification");
            }
        }
    }
}
