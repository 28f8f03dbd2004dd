//! Domain types and services of the marker engine.
//!
//! Purpose: keep map overlays consistent with the saved-location set and
//! mediate every interaction with them. Nothing here talks to a map widget,
//! network or UI toolkit directly; all of that goes through [`ports`].
//!
//! Public surface:
//! - LatLng, GeoBounds, ScreenPoint, ScreenOffset: validated geometry.
//! - LocationCategory: closed category set with colours and pictograms.
//! - PlaceId, LocationRecord, Address, SaveLocationRequest: saved data.
//! - IconFactory: cached SVG marker icons and cluster badges.
//! - MarkerRegistry: reconciliation of records to markers.
//! - ClusterAggregator: screen-space grouping into count badges.
//! - InteractionMediator: the single open overlay and its actions.
//! - ProviderClickInterceptor: provider place clicks turned into overlays.
//! - MarkerEngine: the facade wiring all of the above.

pub mod category;
pub mod click_interceptor;
pub mod clustering;
pub mod geometry;
pub mod icons;
pub mod interaction;
pub mod location;
pub mod marker_engine;
pub mod marker_registry;
pub mod ports;

pub use self::category::LocationCategory;
pub use self::click_interceptor::{ClickOutcome, MapClick, ProviderClickInterceptor};
pub use self::clustering::{ClusterAggregator, ClusterConfig, ClusterMode, ClusterSnapshot};
pub use self::geometry::{CoordinateValidationError, GeoBounds, LatLng, ScreenOffset, ScreenPoint};
pub use self::icons::{IconFactory, IconStyle};
pub use self::interaction::{
    ActionOutcome, CloseReason, InteractionMediator, InteractionSession, InteractionTarget,
    OverlayAction, OverlayContent, OverlayKey, SaveOutcome,
};
pub use self::location::{
    Address, LocationRecord, PlaceId, PlaceIdValidationError, SaveLocationRequest,
};
pub use self::marker_engine::{
    MarkerClickOutcome, MarkerEngine, MarkerEngineConfig, MarkerEnginePorts, ReconcileReport,
};
pub use self::marker_registry::{MarkerRegistry, RegistryReport, SavedPlaceIndex};
