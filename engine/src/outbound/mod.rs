//! Outbound adapters implementing the domain ports.
//!
//! - [`HeadlessMapSurface`]: in-memory map surface with a real projection.
//! - [`HttpLocationRepository`]: saved-location backend over HTTP.
//! - [`HttpPlaceDetailsSource`]: provider place-detail lookups over HTTP.
//! - [`TracingNotificationSink`]: notifications as tracing events.

mod http_body;

pub mod headless_map;
pub mod locations_http;
pub mod places_http;
pub mod tracing_notifications;

pub use headless_map::{HeadlessMapSurface, OpenOverlay, PlacedMarker};
pub use locations_http::HttpLocationRepository;
pub use places_http::{DEFAULT_PLACES_BASE, HttpPlaceDetailsSource};
pub use tracing_notifications::TracingNotificationSink;
