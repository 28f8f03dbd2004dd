//! Fire-and-forget application notifications.
//!
//! The engine never renders toasts; it hands [`Notification`]s to whatever
//! presentation layer the host wires in.

/// A user-facing event raised by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A place was saved.
    LocationSaved {
        /// Name of the saved place.
        name: String,
    },
    /// Saving a place failed.
    SaveFailed {
        /// Short failure description.
        reason: String,
    },
    /// Saving needs a signed-in user.
    SignInRequired,
}

impl Notification {
    /// Text suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            Self::LocationSaved { name } => format!("Saved {name}"),
            Self::SaveFailed { reason } => format!("Could not save location: {reason}"),
            Self::SignInRequired => "Sign in to save locations".to_owned(),
        }
    }

    /// Stable name for structured traces.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LocationSaved { .. } => "location_saved",
            Self::SaveFailed { .. } => "save_failed",
            Self::SignInRequired => "sign_in_required",
        }
    }
}

/// Port receiving notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Fixture sink that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNotificationSink;

impl NotificationSink for FixtureNotificationSink {
    fn notify(&self, _notification: Notification) {}
}
