//! Domain ports: the trait boundary to every external collaborator.
//!
//! Each port ships a `Fixture*` implementation for wiring demos, and a
//! `mockall` mock under `cfg(test)`.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_session;
mod location_repository;
mod map_surface;
mod navigation_launcher;
mod notification_sink;
mod place_details_source;

#[cfg(test)]
pub use auth_session::MockAuthSession;
pub use auth_session::{AuthSession, FixtureAuthSession};
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{
    FixtureLocationRepository, LocationRepository, LocationRepositoryError,
};
#[cfg(test)]
pub use map_surface::MockMapSurface;
pub use map_surface::{
    FixtureMapSurface, MapSurface, MapSurfaceError, MarkerHandle, MarkerKind, MarkerPlacement,
    OverlayAnchor,
};
#[cfg(test)]
pub use navigation_launcher::MockNavigationLauncher;
pub use navigation_launcher::{FixtureNavigationLauncher, NavigationLauncher};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{FixtureNotificationSink, Notification, NotificationSink};
#[cfg(test)]
pub use place_details_source::MockPlaceDetailsSource;
pub use place_details_source::{
    FixturePlaceDetailsSource, PlaceDetailField, PlaceDetails, PlaceDetailsError,
    PlaceDetailsSource,
};

#[cfg(test)]
mod tests;
