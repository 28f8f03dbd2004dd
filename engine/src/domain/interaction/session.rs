//! Interaction targets, sessions and intent outcomes.

use url::Url;

use crate::domain::category::LocationCategory;
use crate::domain::geometry::LatLng;
use crate::domain::location::{Address, LocationRecord, PlaceId, SaveLocationRequest};
use crate::domain::ports::{
    LocationRepositoryError, MarkerHandle, OverlayAnchor, PlaceDetails,
};

use super::content::OverlayContent;

/// Name shown when a provider place could not be looked up.
pub const FALLBACK_PLACE_NAME: &str = "Selected place";
/// Address shown when a provider place could not be looked up.
pub const FALLBACK_ADDRESS: &str = "Details unavailable";

/// A provider place selected on the map, built from a detail lookup or a
/// bare click.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPlace {
    /// Provider identifier.
    pub place_id: PlaceId,
    /// Display name.
    pub name: String,
    /// Single-line address.
    pub address: Option<String>,
    /// Category derived from provider type hints.
    pub category: LocationCategory,
    /// Position; the click point when the provider gave none.
    pub position: LatLng,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of ratings.
    pub user_rating_count: Option<u32>,
    /// Whether the place is open now.
    pub open_now: Option<bool>,
    /// One line per weekday.
    pub weekday_hours: Vec<String>,
    /// Website address.
    pub website: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// False when built without a successful lookup.
    pub details_available: bool,
}

impl SyntheticPlace {
    /// Build from looked-up details. `clicked_at` is used when the details
    /// carry no position.
    pub fn from_details(details: PlaceDetails, clicked_at: LatLng) -> Self {
        let name = details
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_PLACE_NAME.to_owned());
        Self {
            category: LocationCategory::from_provider_types(&details.types),
            place_id: details.place_id,
            name,
            address: details.formatted_address,
            position: details.position.unwrap_or(clicked_at),
            rating: details.rating,
            user_rating_count: details.user_rating_count,
            open_now: details.open_now,
            weekday_hours: details.weekday_hours,
            website: details.website,
            phone_number: details.phone_number,
            details_available: true,
        }
    }

    /// Minimal place used when the lookup failed or timed out.
    pub fn fallback(place_id: PlaceId, clicked_at: LatLng) -> Self {
        Self {
            place_id,
            name: FALLBACK_PLACE_NAME.to_owned(),
            address: Some(FALLBACK_ADDRESS.to_owned()),
            category: LocationCategory::Unknown,
            position: clicked_at,
            rating: None,
            user_rating_count: None,
            open_now: None,
            weekday_hours: Vec::new(),
            website: None,
            phone_number: None,
            details_available: false,
        }
    }

    /// Payload for saving this place.
    pub fn save_request(&self) -> SaveLocationRequest {
        let formatted = self.address.clone().filter(|_| self.details_available);
        SaveLocationRequest::new(
            self.place_id.clone(),
            self.name.clone(),
            self.category,
            self.position,
        )
        .with_address(Address {
            formatted,
            ..Address::default()
        })
    }
}

/// What an overlay is about.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionTarget {
    /// A saved location drawn as a registry marker.
    SavedLocation {
        /// Marker the overlay is attached to.
        handle: MarkerHandle,
        /// Record bound to the marker.
        record: LocationRecord,
    },
    /// A provider place.
    Place(SyntheticPlace),
}

impl InteractionTarget {
    /// Identifier of the target.
    pub const fn place_id(&self) -> &PlaceId {
        match self {
            Self::SavedLocation { record, .. } => &record.place_id,
            Self::Place(place) => &place.place_id,
        }
    }

    /// Display name of the target.
    pub fn name(&self) -> &str {
        match self {
            Self::SavedLocation { record, .. } => &record.name,
            Self::Place(place) => &place.name,
        }
    }

    /// Position of the target, when known.
    pub const fn position(&self) -> Option<LatLng> {
        match self {
            Self::SavedLocation { record, .. } => record.position,
            Self::Place(place) => Some(place.position),
        }
    }

    /// Where the overlay attaches.
    pub const fn anchor(&self) -> OverlayAnchor {
        match self {
            Self::SavedLocation { handle, .. } => OverlayAnchor::Marker(*handle),
            Self::Place(place) => OverlayAnchor::Position(place.position),
        }
    }

    /// Whether the target is a registry marker.
    pub const fn is_saved_location(&self) -> bool {
        matches!(self, Self::SavedLocation { .. })
    }
}

/// The open overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    /// What the overlay shows.
    pub target: InteractionTarget,
    /// Generation the session was opened at.
    pub generation: u64,
    /// Content rendered for this session.
    pub content: OverlayContent,
    /// Attachment point.
    pub anchor: OverlayAnchor,
}

/// Generation captured when asynchronous work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub(super) generation: u64,
}

impl RequestTicket {
    /// Generation the ticket was issued at.
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of a conditional open.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// The overlay opened.
    Opened(InteractionSession),
    /// A newer interaction superseded the request; nothing was rendered.
    Stale,
}

/// Why an overlay closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The overlay's close button.
    CloseButton,
    /// The Escape key.
    Escape,
    /// A click on empty map area.
    OutsideClick,
    /// A call from the host application.
    Programmatic,
    /// Another overlay is opening.
    Superseded,
    /// The marker it was attached to was reconciled away.
    MarkersReconciled,
}

impl CloseReason {
    /// Stable name for structured traces.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CloseButton => "close_button",
            Self::Escape => "escape",
            Self::OutsideClick => "outside_click",
            Self::Programmatic => "programmatic",
            Self::Superseded => "superseded",
            Self::MarkersReconciled => "markers_reconciled",
        }
    }
}

/// Keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    /// Closes the overlay.
    Escape,
    /// Any other key; ignored.
    Other,
}

/// Buttons rendered in an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayAction {
    /// Close the overlay.
    Close,
    /// Save the place.
    Save,
    /// Open directions.
    Directions,
    /// Centre the map on the target.
    Center,
}

impl OverlayAction {
    /// Button caption.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Save => "Save",
            Self::Directions => "Directions",
            Self::Center => "View on map",
        }
    }
}

/// Result of the save intent.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// No overlay was open.
    NothingOpen,
    /// The target is already saved; nothing was sent.
    AlreadySaved,
    /// Nobody is signed in; a prompt was raised and nothing was sent.
    SignInRequired,
    /// The backend stored the place.
    Saved(LocationRecord),
    /// The backend call failed.
    Failed(LocationRepositoryError),
}

/// Result of an overlay button.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Close result; `true` when an overlay was open.
    Closed(bool),
    /// Save result.
    Save(SaveOutcome),
    /// Directions link that was opened, if any.
    Directions(Option<Url>),
    /// Whether the map was re-centred.
    Centered(bool),
}
