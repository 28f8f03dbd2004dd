//! Authoritative set of location markers on the map.
//!
//! Reconciliation is full-clear-and-rebuild: every pass detaches all current
//! markers before placing new ones, so the surface never shows a mix of old
//! and new handles. After a pass the registry holds exactly one marker per
//! distinct `place_id` with valid coordinates.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::geometry::LatLng;
use super::icons::{IconDescriptor, IconFactory, IconStyle};
use super::location::{LocationRecord, PlaceId};
use super::ports::{MapSurface, MarkerHandle, MarkerKind, MarkerPlacement};

/// Stacking order for location markers.
pub const LOCATION_MARKER_Z_INDEX: i32 = 10;

/// A marker bound to one saved record.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredMarker {
    /// Surface handle.
    pub handle: MarkerHandle,
    /// Identifier of the bound record.
    pub place_id: PlaceId,
    /// Marker position.
    pub position: LatLng,
    /// Icon drawn for the marker.
    pub icon: Arc<IconDescriptor>,
    /// The bound record.
    pub record: LocationRecord,
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryReport {
    /// Markers placed.
    pub placed: usize,
    /// Markers detached before placing.
    pub removed: usize,
    /// Records without valid coordinates.
    pub skipped_missing_coordinates: usize,
    /// Records whose `place_id` was already placed in this pass.
    pub skipped_duplicates: usize,
    /// Records whose icon could not be encoded.
    pub skipped_icon_failures: usize,
    /// Records the surface refused to draw.
    pub skipped_surface_failures: usize,
}

impl RegistryReport {
    /// Total records not given a marker.
    pub const fn skipped(&self) -> usize {
        self.skipped_missing_coordinates
            + self.skipped_duplicates
            + self.skipped_icon_failures
            + self.skipped_surface_failures
    }
}

/// Read-only view of the identifiers currently saved.
///
/// Clones share state: every reconciliation publishes into all of them.
#[derive(Debug, Clone, Default)]
pub struct SavedPlaceIndex {
    inner: Arc<RwLock<BTreeSet<PlaceId>>>,
}

impl SavedPlaceIndex {
    /// Whether `place_id` is in the saved set.
    pub fn contains(&self, place_id: &PlaceId) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(place_id)
    }

    /// Number of saved identifiers.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the saved identifiers.
    pub fn snapshot(&self) -> Vec<PlaceId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn publish(&self, ids: BTreeSet<PlaceId>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = ids;
    }
}

/// Owns the location markers and their bindings to records.
#[derive(Debug)]
pub struct MarkerRegistry {
    icons: Arc<IconFactory>,
    icon_size: u32,
    icon_style: IconStyle,
    markers: Vec<RegisteredMarker>,
    by_handle: HashMap<MarkerHandle, usize>,
    records: Vec<LocationRecord>,
    saved: SavedPlaceIndex,
}

impl MarkerRegistry {
    /// Empty registry drawing icons of `icon_size` pixels in `icon_style`.
    pub fn new(icons: Arc<IconFactory>, icon_size: u32, icon_style: IconStyle) -> Self {
        Self {
            icons,
            icon_size,
            icon_style,
            markers: Vec::new(),
            by_handle: HashMap::new(),
            records: Vec::new(),
            saved: SavedPlaceIndex::default(),
        }
    }

    /// Make the surface show exactly the drawable subset of `records`.
    ///
    /// Records are processed in order. A record is skipped, and counted in
    /// the report, when it has no valid position, when its `place_id` was
    /// already placed in this pass, when its icon cannot be encoded, or when
    /// the surface refuses it.
    pub fn reconcile(
        &mut self,
        records: &[LocationRecord],
        surface: &dyn MapSurface,
    ) -> RegistryReport {
        let mut report = RegistryReport {
            removed: self.detach_all(surface),
            ..RegistryReport::default()
        };

        let mut placed_ids: HashSet<&PlaceId> = HashSet::with_capacity(records.len());
        for record in records {
            let Some(position) = record.position else {
                debug!(place_id = %record.place_id, "skipping record without coordinates");
                report.skipped_missing_coordinates += 1;
                continue;
            };
            if placed_ids.contains(&record.place_id) {
                debug!(place_id = %record.place_id, "skipping duplicate record");
                report.skipped_duplicates += 1;
                continue;
            }
            let Some(icon) = self
                .icons
                .icon(record.category, self.icon_size, self.icon_style)
            else {
                report.skipped_icon_failures += 1;
                continue;
            };

            let placement = MarkerPlacement {
                position,
                title: record.name.clone(),
                icon: icon.image.clone(),
                kind: MarkerKind::Location,
                z_index: LOCATION_MARKER_Z_INDEX,
            };
            match surface.place_overlay_marker(&placement) {
                Ok(handle) => {
                    placed_ids.insert(&record.place_id);
                    self.by_handle.insert(handle, self.markers.len());
                    self.markers.push(RegisteredMarker {
                        handle,
                        place_id: record.place_id.clone(),
                        position,
                        icon,
                        record: record.clone(),
                    });
                    report.placed += 1;
                }
                Err(error) => {
                    warn!(
                        place_id = %record.place_id,
                        error = %error,
                        kind = error.kind(),
                        "map surface refused location marker"
                    );
                    report.skipped_surface_failures += 1;
                }
            }
        }

        self.records = records.to_vec();
        self.saved
            .publish(records.iter().map(|record| record.place_id.clone()).collect());

        info!(
            records = records.len(),
            placed = report.placed,
            removed = report.removed,
            skipped_missing_coordinates = report.skipped_missing_coordinates,
            skipped_duplicates = report.skipped_duplicates,
            skipped_icon_failures = report.skipped_icon_failures,
            skipped_surface_failures = report.skipped_surface_failures,
            "reconciled location markers"
        );
        report
    }

    /// Detach every marker and forget all records. Returns the number of
    /// markers removed.
    pub fn clear(&mut self, surface: &dyn MapSurface) -> usize {
        let removed = self.detach_all(surface);
        self.records.clear();
        self.saved.publish(BTreeSet::new());
        info!(removed, "cleared location markers");
        removed
    }

    /// Markers in placement order.
    pub fn markers(&self) -> &[RegisteredMarker] {
        &self.markers
    }

    /// Marker bound to `handle`.
    pub fn marker_for(&self, handle: MarkerHandle) -> Option<&RegisteredMarker> {
        self.by_handle
            .get(&handle)
            .and_then(|index| self.markers.get(*index))
    }

    /// Record bound to `handle`.
    pub fn record_for(&self, handle: MarkerHandle) -> Option<&LocationRecord> {
        self.marker_for(handle).map(|marker| &marker.record)
    }

    /// Handle of the marker drawn for `place_id`.
    pub fn handle_for(&self, place_id: &PlaceId) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .find(|marker| &marker.place_id == place_id)
            .map(|marker| marker.handle)
    }

    /// Whether a marker is drawn for `place_id`.
    pub fn contains(&self, place_id: &PlaceId) -> bool {
        self.handle_for(place_id).is_some()
    }

    /// The record set passed to the last reconciliation.
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Number of markers drawn.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no markers are drawn.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Shared view of the saved identifiers.
    pub fn saved_places(&self) -> SavedPlaceIndex {
        self.saved.clone()
    }

    fn detach_all(&mut self, surface: &dyn MapSurface) -> usize {
        let removed = self.markers.len();
        for marker in self.markers.drain(..) {
            surface.remove_overlay_marker(marker.handle);
        }
        self.by_handle.clear();
        removed
    }
}
