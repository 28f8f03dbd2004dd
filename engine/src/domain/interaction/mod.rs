//! Single-overlay interaction mediator.
//!
//! The mediator owns the only open [`InteractionSession`]. Opening always
//! closes the previous overlay first, so at most one is ever rendered.
//!
//! Asynchronous work is ordered with a generation counter. Every open and
//! every close bumps it; work that captured an older [`RequestTicket`] is
//! discarded when it resolves.

mod content;
mod session;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use url::Url;

use super::geometry::ScreenOffset;
use super::marker_registry::SavedPlaceIndex;
use super::ports::{
    AuthSession, LocationRepository, MapSurface, NavigationLauncher, Notification,
    NotificationSink,
};

pub use content::{OverlayContent, OverlayDetail};
pub use session::{
    ActionOutcome, CloseReason, FALLBACK_ADDRESS, FALLBACK_PLACE_NAME, InteractionSession,
    InteractionTarget, OpenOutcome, OverlayAction, OverlayKey, RequestTicket, SaveOutcome,
    SyntheticPlace,
};

/// Default directions endpoint.
pub const DEFAULT_DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";
/// Default pan applied after centring so the overlay stays in view.
pub const DEFAULT_PAN_OFFSET: ScreenOffset = ScreenOffset { dx: 0, dy: -100 };

/// Collaborators the mediator drives.
#[derive(Clone)]
pub struct MediatorPorts {
    /// Map the overlay is drawn on.
    pub surface: Arc<dyn MapSurface>,
    /// Backend receiving saves.
    pub repository: Arc<dyn LocationRepository>,
    /// Sign-in predicate.
    pub session: Arc<dyn AuthSession>,
    /// Notification presenter.
    pub notifications: Arc<dyn NotificationSink>,
    /// External link opener.
    pub navigation: Arc<dyn NavigationLauncher>,
}

/// Mediator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MediatorConfig {
    /// Base URL for directions links; `None` uses [`DEFAULT_DIRECTIONS_BASE`].
    pub directions_base: Option<Url>,
    /// Pan applied after centring.
    pub pan_offset: ScreenOffset,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            directions_base: None,
            pan_offset: DEFAULT_PAN_OFFSET,
        }
    }
}

#[derive(Debug, Default)]
struct MediatorState {
    generation: u64,
    session: Option<InteractionSession>,
}

/// Serialises overlay opens, closes and overlay actions.
pub struct InteractionMediator {
    ports: MediatorPorts,
    saved: SavedPlaceIndex,
    config: MediatorConfig,
    state: Mutex<MediatorState>,
}

impl InteractionMediator {
    /// Mediator over `ports`. `saved` decides whether provider places are
    /// offered a save button.
    pub fn new(ports: MediatorPorts, saved: SavedPlaceIndex, config: MediatorConfig) -> Self {
        Self {
            ports,
            saved,
            config,
            state: Mutex::new(MediatorState::default()),
        }
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// The open session, if any.
    pub fn current(&self) -> Option<InteractionSession> {
        self.lock().session.clone()
    }

    /// Start asynchronous work that will open an overlay later.
    ///
    /// Any ticket issued before this one becomes stale.
    pub fn begin_request(&self) -> RequestTicket {
        let mut state = self.lock();
        state.generation += 1;
        RequestTicket {
            generation: state.generation,
        }
    }

    /// Open an overlay for `target`, closing any open one first.
    pub fn open(&self, target: InteractionTarget) -> InteractionSession {
        let mut state = self.lock();
        self.open_locked(&mut state, target)
    }

    /// Open an overlay only if nothing happened since `ticket` was issued.
    pub fn open_if_current(&self, ticket: RequestTicket, target: InteractionTarget) -> OpenOutcome {
        let mut state = self.lock();
        if ticket.generation != state.generation {
            debug!(
                place_id = %target.place_id(),
                ticket = ticket.generation,
                current = state.generation,
                "discarding stale overlay request"
            );
            return OpenOutcome::Stale;
        }
        OpenOutcome::Opened(self.open_locked(&mut state, target))
    }

    /// Close the overlay. Returns whether one was open.
    ///
    /// Pending requests become stale even when nothing was open.
    pub fn close(&self, reason: CloseReason) -> bool {
        let mut state = self.lock();
        state.generation += 1;
        self.close_locked(&mut state, reason)
    }

    /// React to a key press. Returns whether an overlay closed.
    pub fn handle_key(&self, key: OverlayKey) -> bool {
        match key {
            OverlayKey::Escape => self.close(CloseReason::Escape),
            OverlayKey::Other => false,
        }
    }

    /// Close the overlay if it is attached to a registry marker.
    pub fn discard_marker_session(&self) -> bool {
        let mut state = self.lock();
        let attached_to_marker = state
            .session
            .as_ref()
            .is_some_and(|session| session.target.is_saved_location());
        if !attached_to_marker {
            return false;
        }
        state.generation += 1;
        self.close_locked(&mut state, CloseReason::MarkersReconciled)
    }

    /// Save the open provider place.
    ///
    /// A signed-out user is prompted to sign in whatever the overlay shows.
    /// Mediator state is never changed; the target is read once before the
    /// backend call.
    pub async fn save(&self) -> SaveOutcome {
        let target = match self.lock().session.as_ref() {
            Some(session) => session.target.clone(),
            None => return SaveOutcome::NothingOpen,
        };
        if !self.ports.session.is_authenticated() {
            info!(place_id = %target.place_id(), "save requires sign-in");
            self.ports.notifications.notify(Notification::SignInRequired);
            return SaveOutcome::SignInRequired;
        }
        let place = match target {
            InteractionTarget::SavedLocation { .. } => return SaveOutcome::AlreadySaved,
            InteractionTarget::Place(place) => place,
        };
        if self.saved.contains(&place.place_id) {
            return SaveOutcome::AlreadySaved;
        }

        let request = place.save_request();
        match self.ports.repository.save_location(&request).await {
            Ok(record) => {
                info!(place_id = %record.place_id, "location saved");
                self.ports.notifications.notify(Notification::LocationSaved {
                    name: record.name.clone(),
                });
                SaveOutcome::Saved(record)
            }
            Err(error) => {
                warn!(
                    place_id = %request.place_id,
                    error = %error,
                    kind = error.kind(),
                    "saving location failed"
                );
                self.ports.notifications.notify(Notification::SaveFailed {
                    reason: error.to_string(),
                });
                SaveOutcome::Failed(error)
            }
        }
    }

    /// Open directions to the current target. Returns the launched URL.
    pub fn directions(&self) -> Option<Url> {
        let (position, place_id) = {
            let state = self.lock();
            let target = &state.session.as_ref()?.target;
            (target.position()?, target.place_id().clone())
        };
        let mut url = match &self.config.directions_base {
            Some(base) => base.clone(),
            None => Url::parse(DEFAULT_DIRECTIONS_BASE).ok()?,
        };
        url.query_pairs_mut()
            .clear()
            .append_pair("api", "1")
            .append_pair("destination", &position.to_string())
            .append_pair("destination_place_id", place_id.as_str());
        debug!(place_id = %place_id, "opening directions");
        self.ports.navigation.open_external(&url);
        Some(url)
    }

    /// Centre the map on the current target. Returns whether it moved.
    pub fn center(&self) -> bool {
        let Some(position) = self
            .lock()
            .session
            .as_ref()
            .and_then(|session| session.target.position())
        else {
            return false;
        };
        self.ports
            .surface
            .center_on(position, Some(self.config.pan_offset));
        true
    }

    /// Dispatch an overlay button.
    pub async fn perform(&self, action: OverlayAction) -> ActionOutcome {
        match action {
            OverlayAction::Close => ActionOutcome::Closed(self.close(CloseReason::CloseButton)),
            OverlayAction::Save => ActionOutcome::Save(self.save().await),
            OverlayAction::Directions => ActionOutcome::Directions(self.directions()),
            OverlayAction::Center => ActionOutcome::Centered(self.center()),
        }
    }

    fn open_locked(
        &self,
        state: &mut MediatorState,
        target: InteractionTarget,
    ) -> InteractionSession {
        state.generation += 1;
        self.close_locked(state, CloseReason::Superseded);

        let saved = match &target {
            InteractionTarget::SavedLocation { .. } => true,
            InteractionTarget::Place(place) => self.saved.contains(&place.place_id),
        };
        let content = OverlayContent::for_target(&target, saved);
        let anchor = target.anchor();
        self.ports.surface.open_info_overlay(&content, anchor);
        debug!(
            place_id = %target.place_id(),
            generation = state.generation,
            "opened overlay"
        );

        let session = InteractionSession {
            target,
            generation: state.generation,
            content,
            anchor,
        };
        state.session = Some(session.clone());
        session
    }

    fn close_locked(&self, state: &mut MediatorState, reason: CloseReason) -> bool {
        let Some(session) = state.session.take() else {
            return false;
        };
        self.ports.surface.close_info_overlay();
        debug!(
            place_id = %session.target.place_id(),
            reason = reason.as_str(),
            "closed overlay"
        );
        true
    }

    fn lock(&self) -> MutexGuard<'_, MediatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
