//! In-memory map surface with a Web Mercator projection.
//!
//! Used by the demo binary and tests in place of a real map widget. It
//! records every call the engine makes so behaviour can be asserted on.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::geometry::{GeoBounds, LatLng, ScreenOffset, ScreenPoint};
use crate::domain::interaction::OverlayContent;
use crate::domain::ports::{
    MapSurface, MapSurfaceError, MarkerHandle, MarkerKind, MarkerPlacement, OverlayAnchor,
};

/// Edge length of one map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;
/// Deepest zoom `fit_bounds` will choose.
pub const MAX_FIT_ZOOM: f64 = 21.0;
/// Latitude limit of the Web Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// A marker currently on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    /// Surface handle.
    pub handle: MarkerHandle,
    /// What the engine asked to draw.
    pub placement: MarkerPlacement,
    /// Whether the marker is shown.
    pub visible: bool,
}

/// The info overlay currently open.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOverlay {
    /// Rendered content.
    pub content: OverlayContent,
    /// Attachment point.
    pub anchor: OverlayAnchor,
}

/// Camera parameters needed for projection.
#[derive(Debug, Clone, Copy)]
struct View {
    center: LatLng,
    zoom: f64,
    width: u32,
    height: u32,
}

impl View {
    fn half_extent(self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    fn project(self, position: LatLng) -> ScreenPoint {
        let scale = world_size(self.zoom);
        let (half_w, half_h) = self.half_extent();
        ScreenPoint {
            x: (world_x(position.lng()) - world_x(self.center.lng())) * scale + half_w,
            y: (world_y(position.lat()) - world_y(self.center.lat())) * scale + half_h,
        }
    }

    fn unproject(self, point: ScreenPoint) -> Option<LatLng> {
        let scale = world_size(self.zoom);
        let (half_w, half_h) = self.half_extent();
        let x = world_x(self.center.lng()) + (point.x - half_w) / scale;
        let y = world_y(self.center.lat()) + (point.y - half_h) / scale;
        let lng = (x * 360.0 - 180.0).clamp(-180.0, 180.0);
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        LatLng::new(lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT), lng).ok()
    }
}

#[derive(Debug)]
struct HeadlessState {
    view: View,
    projection_ready: bool,
    next_handle: u64,
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    refused_titles: BTreeSet<String>,
    refused_kind: Option<MarkerKind>,
    overlay: Option<OpenOverlay>,
    overlays_opened: usize,
    overlays_closed: usize,
    last_center: Option<(LatLng, Option<ScreenOffset>)>,
    last_fit: Option<GeoBounds>,
}

impl HeadlessState {
    fn unproject(&self, point: ScreenPoint) -> Option<LatLng> {
        if !self.projection_ready {
            return None;
        }
        self.view.unproject(point)
    }
}

/// Headless [`MapSurface`] implementation.
#[derive(Debug)]
pub struct HeadlessMapSurface {
    state: Mutex<HeadlessState>,
}

impl HeadlessMapSurface {
    /// Surface of `width` x `height` pixels centred on `center` at `zoom`.
    pub fn new(center: LatLng, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                view: View {
                    center,
                    zoom,
                    width,
                    height,
                },
                projection_ready: true,
                next_handle: 0,
                markers: BTreeMap::new(),
                refused_titles: BTreeSet::new(),
                refused_kind: None,
                overlay: None,
                overlays_opened: 0,
                overlays_closed: 0,
                last_center: None,
                last_fit: None,
            }),
        }
    }

    /// Move the view.
    pub fn set_view(&self, center: LatLng, zoom: f64) {
        let mut state = self.lock();
        state.view.center = center;
        state.view.zoom = zoom;
    }

    /// Current centre.
    pub fn center(&self) -> LatLng {
        self.lock().view.center
    }

    /// Simulate a map whose projection has not loaded yet.
    pub fn set_projection_ready(&self, ready: bool) {
        self.lock().projection_ready = ready;
    }

    /// Refuse future markers with this title.
    pub fn refuse_markers_titled(&self, title: impl Into<String>) {
        self.lock().refused_titles.insert(title.into());
    }

    /// Refuse every future marker of `kind`, or none.
    pub fn refuse_kind(&self, kind: Option<MarkerKind>) {
        self.lock().refused_kind = kind;
    }

    /// Geographic position under a pixel of the container.
    pub fn position_at(&self, point: ScreenPoint) -> Option<LatLng> {
        self.lock().unproject(point)
    }

    /// Every marker on the surface, by handle.
    pub fn markers(&self) -> Vec<PlacedMarker> {
        self.lock().markers.values().cloned().collect()
    }

    /// Shown markers of `kind`.
    pub fn visible_markers(&self, kind: MarkerKind) -> Vec<PlacedMarker> {
        self.lock()
            .markers
            .values()
            .filter(|marker| marker.visible && marker.placement.kind == kind)
            .cloned()
            .collect()
    }

    /// Marker behind `handle`, if still placed.
    pub fn marker(&self, handle: MarkerHandle) -> Option<PlacedMarker> {
        self.lock().markers.get(&handle).cloned()
    }

    /// The open overlay.
    pub fn open_overlay(&self) -> Option<OpenOverlay> {
        self.lock().overlay.clone()
    }

    /// How many times an overlay was opened.
    pub fn overlays_opened(&self) -> usize {
        self.lock().overlays_opened
    }

    /// How many times an open overlay was closed.
    pub fn overlays_closed(&self) -> usize {
        self.lock().overlays_closed
    }

    /// Arguments of the last `center_on` call.
    pub fn last_center(&self) -> Option<(LatLng, Option<ScreenOffset>)> {
        self.lock().last_center
    }

    /// Bounds passed to the last `fit_bounds` call.
    pub fn last_fit(&self) -> Option<GeoBounds> {
        self.lock().last_fit
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapSurface for HeadlessMapSurface {
    fn current_zoom(&self) -> f64 {
        self.lock().view.zoom
    }

    fn current_viewport_bounds(&self) -> Option<GeoBounds> {
        let state = self.lock();
        let (width, height) = (f64::from(state.view.width), f64::from(state.view.height));
        let south_west = state.unproject(ScreenPoint { x: 0.0, y: height })?;
        let north_east = state.unproject(ScreenPoint { x: width, y: 0.0 })?;
        Some(GeoBounds {
            south_west,
            north_east,
        })
    }

    fn project_to_screen(&self, position: LatLng) -> Option<ScreenPoint> {
        let state = self.lock();
        state
            .projection_ready
            .then(|| state.view.project(position))
    }

    fn place_overlay_marker(
        &self,
        placement: &MarkerPlacement,
    ) -> Result<MarkerHandle, MapSurfaceError> {
        let mut state = self.lock();
        if state.refused_kind == Some(placement.kind) {
            return Err(MapSurfaceError::rejected("marker kind disabled"));
        }
        if state.refused_titles.contains(&placement.title) {
            return Err(MapSurfaceError::rejected(format!(
                "marker {} refused",
                placement.title
            )));
        }
        state.next_handle += 1;
        let handle = MarkerHandle::new(state.next_handle);
        state.markers.insert(
            handle,
            PlacedMarker {
                handle,
                placement: placement.clone(),
                visible: true,
            },
        );
        Ok(handle)
    }

    fn remove_overlay_marker(&self, handle: MarkerHandle) {
        self.lock().markers.remove(&handle);
    }

    fn set_marker_visible(&self, handle: MarkerHandle, visible: bool) {
        if let Some(marker) = self.lock().markers.get_mut(&handle) {
            marker.visible = visible;
        }
    }

    fn open_info_overlay(&self, content: &OverlayContent, anchor: OverlayAnchor) {
        let mut state = self.lock();
        state.overlay = Some(OpenOverlay {
            content: content.clone(),
            anchor,
        });
        state.overlays_opened += 1;
    }

    fn close_info_overlay(&self) {
        let mut state = self.lock();
        if state.overlay.take().is_some() {
            state.overlays_closed += 1;
        }
    }

    fn center_on(&self, position: LatLng, offset: Option<ScreenOffset>) {
        let mut state = self.lock();
        state.last_center = Some((position, offset));
        let centred = View {
            center: position,
            ..state.view
        };
        // The offset pans the camera; a negative `dy` leaves the target below
        // the centre.
        let shifted = offset.and_then(|offset| {
            let (half_w, half_h) = centred.half_extent();
            centred.unproject(ScreenPoint {
                x: half_w + f64::from(offset.dx),
                y: half_h + f64::from(offset.dy),
            })
        });
        state.view.center = shifted.unwrap_or(position);
    }

    fn fit_bounds(&self, bounds: GeoBounds) {
        let mut state = self.lock();
        state.last_fit = Some(bounds);
        state.view.center = bounds.center();

        let span_x = (world_x(bounds.north_east.lng()) - world_x(bounds.south_west.lng())).abs();
        let span_y = (world_y(bounds.south_west.lat()) - world_y(bounds.north_east.lat())).abs();
        let fit = |pixels: u32, span: f64| {
            if span <= f64::EPSILON {
                MAX_FIT_ZOOM
            } else {
                (f64::from(pixels) / (span * TILE_SIZE)).log2()
            }
        };
        let zoom = fit(state.view.width, span_x).min(fit(state.view.height, span_y));
        state.view.zoom = zoom.floor().clamp(0.0, MAX_FIT_ZOOM);
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Horizontal position on the unit world square.
fn world_x(lng: f64) -> f64 {
    (lng + 180.0) / 360.0
}

/// Vertical position on the unit world square, zero at the top.
fn world_y(lat: f64) -> f64 {
    let sin_lat = lat
        .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
        .to_radians()
        .sin();
    0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)
}

#[cfg(test)]
mod tests {
    //! Projection and bookkeeping tests for the headless surface.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn surface() -> HeadlessMapSurface {
        HeadlessMapSurface::new(LatLng::new(51.5072, -0.1276).expect("valid"), 12.0, 800, 600)
    }

    fn close(left: f64, right: f64, tolerance: f64) -> bool {
        (left - right).abs() <= tolerance
    }

    #[rstest]
    fn centre_projects_to_the_middle(surface: HeadlessMapSurface) {
        let point = surface
            .project_to_screen(surface.center())
            .expect("projection ready");
        assert!(close(point.x, 400.0, 1e-6));
        assert!(close(point.y, 300.0, 1e-6));
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(123.0, 456.0)]
    #[case(800.0, 600.0)]
    fn unprojection_inverts_projection(
        surface: HeadlessMapSurface,
        #[case] x: f64,
        #[case] y: f64,
    ) {
        let position = surface
            .position_at(ScreenPoint { x, y })
            .expect("inside the world");
        let back = surface.project_to_screen(position).expect("projection ready");
        assert!(close(back.x, x, 1e-6));
        assert!(close(back.y, y, 1e-6));
    }

    #[rstest]
    fn viewport_contains_the_centre(surface: HeadlessMapSurface) {
        let bounds = surface.current_viewport_bounds().expect("bounds known");
        assert!(bounds.contains(&surface.center()));
        assert!(bounds.south_west.lat() < bounds.north_east.lat());
    }

    #[rstest]
    fn projection_can_be_unavailable(surface: HeadlessMapSurface) {
        surface.set_projection_ready(false);
        assert!(surface.project_to_screen(surface.center()).is_none());
        assert!(surface.current_viewport_bounds().is_none());
    }

    #[rstest]
    fn fit_bounds_recentres_and_zooms_in(surface: HeadlessMapSurface) {
        let bounds = GeoBounds {
            south_west: LatLng::new(51.500, -0.130).expect("valid"),
            north_east: LatLng::new(51.502, -0.126).expect("valid"),
        };
        surface.fit_bounds(bounds);

        assert_eq!(surface.last_fit(), Some(bounds));
        assert_eq!(surface.center(), bounds.center());
        let zoom = surface.current_zoom();
        assert!(zoom > 12.0);
        let view = surface.current_viewport_bounds().expect("bounds known");
        assert!(view.contains(&bounds.south_west));
        assert!(view.contains(&bounds.north_east));
    }

    #[rstest]
    fn center_on_applies_the_pan_offset(surface: HeadlessMapSurface) {
        let target = LatLng::new(51.51, -0.10).expect("valid");
        surface.center_on(target, Some(ScreenOffset { dx: 0, dy: -100 }));

        let point = surface.project_to_screen(target).expect("projection ready");
        assert!(close(point.x, 400.0, 1e-6));
        assert!(close(point.y, 400.0, 1e-6));
        assert_eq!(
            surface.last_center(),
            Some((target, Some(ScreenOffset { dx: 0, dy: -100 })))
        );
    }

    #[rstest]
    fn overlay_bookkeeping_counts_real_closes(surface: HeadlessMapSurface) {
        surface.close_info_overlay();
        assert_eq!(surface.overlays_closed(), 0);

        let content = OverlayContent {
            title: "Somewhere".to_owned(),
            address: None,
            category: crate::domain::LocationCategory::Unknown,
            category_label: "Other",
            category_color: "#9E9E9E",
            details: Vec::new(),
            actions: Vec::new(),
            saved: false,
        };
        surface.open_info_overlay(&content, OverlayAnchor::Position(surface.center()));
        surface.close_info_overlay();
        assert_eq!(surface.overlays_opened(), 1);
        assert_eq!(surface.overlays_closed(), 1);
        assert!(surface.open_overlay().is_none());
    }
}
