//! Interception of clicks on the provider's own points of interest.
//!
//! A click carrying a provider place identifier is turned into an engine
//! overlay: details are looked up with a bounded wait, a fallback place is
//! used when the lookup fails, and the result opens only if nothing newer
//! happened meanwhile. Clicks on empty map area close the open overlay.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use super::geometry::LatLng;
use super::interaction::{
    CloseReason, InteractionMediator, InteractionSession, InteractionTarget, OpenOutcome,
    SyntheticPlace,
};
use super::location::PlaceId;
use super::ports::{PlaceDetailField, PlaceDetailsSource};

/// Default window within which a repeated click on the same place is ignored.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_millis(500);
/// Default bound on a place-detail lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A click on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    /// Where the click landed.
    pub position: LatLng,
    /// Provider place under the cursor, if any.
    pub native_place_id: Option<PlaceId>,
}

impl MapClick {
    /// Click on empty map area.
    pub const fn empty(position: LatLng) -> Self {
        Self {
            position,
            native_place_id: None,
        }
    }

    /// Click on a provider place.
    pub const fn on_place(position: LatLng, place_id: PlaceId) -> Self {
        Self {
            position,
            native_place_id: Some(place_id),
        }
    }
}

/// What a click led to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The click hit no provider place.
    EmptyArea {
        /// Whether an overlay was closed.
        closed_overlay: bool,
    },
    /// A repeat of the last accepted click; ignored.
    Duplicate,
    /// An overlay opened for the place.
    Opened(InteractionSession),
    /// A newer interaction won; nothing was rendered.
    Stale,
}

impl ClickOutcome {
    /// Whether the provider's built-in overlay must be suppressed.
    pub const fn suppresses_provider_overlay(&self) -> bool {
        !matches!(self, Self::EmptyArea { .. })
    }
}

/// Timing parameters for click handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickInterceptorConfig {
    /// Repeated clicks on the same place within this window are ignored.
    pub dedup_window: Duration,
    /// Upper bound on a detail lookup.
    pub lookup_timeout: Duration,
}

impl Default for ClickInterceptorConfig {
    fn default() -> Self {
        Self {
            dedup_window: DEFAULT_DEDUP_WINDOW,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
struct AcceptedClick {
    place_id: PlaceId,
    at: DateTime<Utc>,
}

/// Replaces provider place overlays with engine overlays.
pub struct ProviderClickInterceptor {
    clock: Arc<dyn Clock>,
    details: Arc<dyn PlaceDetailsSource>,
    mediator: Arc<InteractionMediator>,
    config: ClickInterceptorConfig,
    last_accepted: Mutex<Option<AcceptedClick>>,
}

impl ProviderClickInterceptor {
    /// Interceptor opening overlays through `mediator`.
    pub fn new(
        clock: Arc<dyn Clock>,
        details: Arc<dyn PlaceDetailsSource>,
        mediator: Arc<InteractionMediator>,
        config: ClickInterceptorConfig,
    ) -> Self {
        Self {
            clock,
            details,
            mediator,
            config,
            last_accepted: Mutex::new(None),
        }
    }

    /// Handle one map click.
    pub async fn handle_click(&self, click: MapClick) -> ClickOutcome {
        let Some(place_id) = click.native_place_id else {
            let closed_overlay = self.mediator.close(CloseReason::OutsideClick);
            return ClickOutcome::EmptyArea { closed_overlay };
        };
        if !self.accept(&place_id) {
            debug!(place_id = %place_id, "ignoring repeated place click");
            return ClickOutcome::Duplicate;
        }

        let ticket = self.mediator.begin_request();
        let place = self.resolve(place_id, click.position).await;
        match self
            .mediator
            .open_if_current(ticket, InteractionTarget::Place(place))
        {
            OpenOutcome::Opened(session) => ClickOutcome::Opened(session),
            OpenOutcome::Stale => ClickOutcome::Stale,
        }
    }

    /// Record the click unless it repeats the last accepted one too soon.
    fn accept(&self, place_id: &PlaceId) -> bool {
        let now = self.clock.utc();
        let window = TimeDelta::from_std(self.config.dedup_window).unwrap_or(TimeDelta::MAX);
        let mut last = self.lock();
        let repeated = last.as_ref().is_some_and(|previous| {
            &previous.place_id == place_id && now.signed_duration_since(previous.at) < window
        });
        if repeated {
            return false;
        }
        *last = Some(AcceptedClick {
            place_id: place_id.clone(),
            at: now,
        });
        true
    }

    async fn resolve(&self, place_id: PlaceId, clicked_at: LatLng) -> SyntheticPlace {
        let lookup = self
            .details
            .lookup_place_details(&place_id, &PlaceDetailField::OVERLAY);
        let result = tokio::time::timeout(self.config.lookup_timeout, lookup).await;
        match result {
            Ok(Ok(details)) => SyntheticPlace::from_details(details, clicked_at),
            Ok(Err(error)) => {
                warn!(
                    place_id = %place_id,
                    error = %error,
                    kind = error.kind(),
                    "place lookup failed; showing fallback"
                );
                SyntheticPlace::fallback(place_id, clicked_at)
            }
            Err(_) => {
                warn!(
                    place_id = %place_id,
                    timeout_ms = u64::try_from(self.config.lookup_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                    "place lookup timed out; showing fallback"
                );
                SyntheticPlace::fallback(place_id, clicked_at)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<AcceptedClick>> {
        self.last_accepted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests;
