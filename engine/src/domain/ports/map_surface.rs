//! Driven port for the interactive map surface.
//!
//! The engine never touches provider primitives directly. Everything it
//! draws, hides, projects or opens goes through [`MapSurface`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::geometry::{GeoBounds, LatLng, ScreenOffset, ScreenPoint};
use crate::domain::icons::IconImage;
use crate::domain::interaction::OverlayContent;

use super::define_port_error;

/// Opaque identifier of an overlay marker placed on the surface.
///
/// Handles are only meaningful until the next reconciliation; callers must
/// not hold on to them across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    /// Wrap a surface-issued identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// What a placed overlay marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// A saved location.
    Location,
    /// A cluster count badge.
    ClusterBadge,
}

/// Everything the surface needs to draw one overlay marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPlacement {
    /// Geographic position of the anchor point.
    pub position: LatLng,
    /// Hover title.
    pub title: String,
    /// Rendered icon.
    pub icon: IconImage,
    /// Marker role.
    pub kind: MarkerKind,
    /// Stacking order; badges sit above locations.
    pub z_index: i32,
}

/// Where an info overlay is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayAnchor {
    /// Above an overlay marker.
    Marker(MarkerHandle),
    /// At a free geographic position, for provider places.
    Position(LatLng),
}

define_port_error! {
    /// Errors raised by the map surface when placing overlays.
    pub enum MapSurfaceError {
        /// The surface refused the placement.
        Rejected { message: String } => "map surface rejected placement: {message}",
        /// The surface is not ready or has been torn down.
        Unavailable { message: String } => "map surface unavailable: {message}",
    }
}

/// Port for the map the engine draws on.
///
/// Implementations are called synchronously from within engine locks and
/// must not call back into the engine.
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send + Sync {
    /// Current zoom level. Fractional levels are allowed.
    fn current_zoom(&self) -> f64;

    /// Visible geographic area, when known.
    fn current_viewport_bounds(&self) -> Option<GeoBounds>;

    /// Pixel position of `position` in the map container, or `None` when the
    /// projection is not ready.
    fn project_to_screen(&self, position: LatLng) -> Option<ScreenPoint>;

    /// Draw a marker and return its handle.
    fn place_overlay_marker(
        &self,
        placement: &MarkerPlacement,
    ) -> Result<MarkerHandle, MapSurfaceError>;

    /// Detach a marker. Unknown handles are ignored.
    fn remove_overlay_marker(&self, handle: MarkerHandle);

    /// Show or hide a placed marker without detaching it.
    fn set_marker_visible(&self, handle: MarkerHandle, visible: bool);

    /// Open the single info overlay, replacing whatever the surface shows.
    fn open_info_overlay(&self, content: &OverlayContent, anchor: OverlayAnchor);

    /// Close the info overlay if one is open.
    fn close_info_overlay(&self);

    /// Pan so `position` is centred, then shift by `offset` pixels.
    fn center_on(&self, position: LatLng, offset: Option<ScreenOffset>);

    /// Pan and zoom so `bounds` fills the viewport.
    fn fit_bounds(&self, bounds: GeoBounds);
}

/// Fixture surface that accepts every call, has no projection and draws
/// nothing.
#[derive(Debug, Default)]
pub struct FixtureMapSurface {
    next_handle: AtomicU64,
}

impl MapSurface for FixtureMapSurface {
    fn current_zoom(&self) -> f64 {
        12.0
    }

    fn current_viewport_bounds(&self) -> Option<GeoBounds> {
        None
    }

    fn project_to_screen(&self, _position: LatLng) -> Option<ScreenPoint> {
        None
    }

    fn place_overlay_marker(
        &self,
        _placement: &MarkerPlacement,
    ) -> Result<MarkerHandle, MapSurfaceError> {
        Ok(MarkerHandle::new(
            self.next_handle.fetch_add(1, Ordering::Relaxed) + 1,
        ))
    }

    fn remove_overlay_marker(&self, _handle: MarkerHandle) {}

    fn set_marker_visible(&self, _handle: MarkerHandle, _visible: bool) {}

    fn open_info_overlay(&self, _content: &OverlayContent, _anchor: OverlayAnchor) {}

    fn close_info_overlay(&self) {}

    fn center_on(&self, _position: LatLng, _offset: Option<ScreenOffset>) {}

    fn fit_bounds(&self, _bounds: GeoBounds) {}
}
