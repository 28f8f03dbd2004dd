//! Engine facade wiring registry, clustering, interaction and click
//! interception behind one type.
//!
//! Registry and clustering state sit behind a single layer lock, so a
//! reconciliation, its session discard and the cluster re-render happen as
//! one step. Lock order is always layer, then mediator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mockable::Clock;
use tracing::{info, warn};
use url::Url;

use super::click_interceptor::{
    ClickInterceptorConfig, ClickOutcome, DEFAULT_DEDUP_WINDOW, DEFAULT_LOOKUP_TIMEOUT, MapClick,
    ProviderClickInterceptor,
};
use super::clustering::{ClusterAggregator, ClusterConfig, ClusterSnapshot};
use super::geometry::{GeoBounds, ScreenOffset};
use super::icons::{
    ClusterBadgeRenderer, DEFAULT_ICON_SIZE, DEFAULT_MAX_DATA_URI_BYTES, IconEncoding,
    IconFactory, IconStyle,
};
use super::interaction::{
    ActionOutcome, CloseReason, DEFAULT_PAN_OFFSET, InteractionMediator, InteractionSession,
    InteractionTarget, MediatorConfig, MediatorPorts, OverlayAction, OverlayKey, SaveOutcome,
};
use super::location::{LocationRecord, PlaceId};
use super::marker_registry::{MarkerRegistry, RegistryReport, SavedPlaceIndex};
use super::ports::{
    AuthSession, LocationRepository, LocationRepositoryError, MapSurface, MarkerHandle,
    NavigationLauncher, NotificationSink, PlaceDetailsSource,
};

/// Engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEngineConfig {
    /// Clustering parameters.
    pub cluster: ClusterConfig,
    /// Marker icon edge length in pixels.
    pub icon_size: u32,
    /// Marker icon style.
    pub icon_style: IconStyle,
    /// Longest data URI an icon may encode to.
    pub max_icon_data_uri_bytes: usize,
    /// Repeated clicks on the same place within this window are ignored.
    pub dedup_window: Duration,
    /// Upper bound on a place-detail lookup.
    pub details_timeout: Duration,
    /// Pan applied after centring on a target.
    pub pan_offset: ScreenOffset,
    /// Directions endpoint; `None` uses the default.
    pub directions_base: Option<Url>,
}

impl Default for MarkerEngineConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            icon_size: DEFAULT_ICON_SIZE,
            icon_style: IconStyle::Standard,
            max_icon_data_uri_bytes: DEFAULT_MAX_DATA_URI_BYTES,
            dedup_window: DEFAULT_DEDUP_WINDOW,
            details_timeout: DEFAULT_LOOKUP_TIMEOUT,
            pan_offset: DEFAULT_PAN_OFFSET,
            directions_base: None,
        }
    }
}

/// Collaborators the engine drives.
#[derive(Clone)]
pub struct MarkerEnginePorts {
    /// Map everything is drawn on.
    pub surface: Arc<dyn MapSurface>,
    /// Saved-location backend.
    pub repository: Arc<dyn LocationRepository>,
    /// Provider place-detail lookups.
    pub place_details: Arc<dyn PlaceDetailsSource>,
    /// Sign-in predicate.
    pub session: Arc<dyn AuthSession>,
    /// Notification presenter.
    pub notifications: Arc<dyn NotificationSink>,
    /// External link opener.
    pub navigation: Arc<dyn NavigationLauncher>,
}

/// Result of a marker update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    /// Registry counts.
    pub markers: RegistryReport,
    /// Clustering after the update.
    pub clusters: ClusterSnapshot,
    /// Whether an overlay attached to an old marker was closed.
    pub closed_overlay: bool,
}

/// What a marker click led to.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerClickOutcome {
    /// A saved location's overlay opened.
    Opened(InteractionSession),
    /// A cluster badge was clicked; the map zoomed to its members.
    ClusterExpanded(GeoBounds),
    /// The handle belongs to nothing the engine drew.
    Unknown,
}

#[derive(Debug)]
struct MarkerLayer {
    registry: MarkerRegistry,
    clusters: ClusterAggregator,
}

/// Keeps map markers in step with saved locations and mediates every
/// interaction with them.
pub struct MarkerEngine {
    surface: Arc<dyn MapSurface>,
    repository: Arc<dyn LocationRepository>,
    mediator: Arc<InteractionMediator>,
    interceptor: ProviderClickInterceptor,
    pan_offset: ScreenOffset,
    layer: Mutex<MarkerLayer>,
}

impl MarkerEngine {
    /// Engine over `ports`. Nothing is drawn until markers are updated.
    pub fn new(
        ports: MarkerEnginePorts,
        clock: Arc<dyn Clock>,
        config: MarkerEngineConfig,
    ) -> Self {
        let encoding = IconEncoding::new(config.max_icon_data_uri_bytes);
        let icons = Arc::new(IconFactory::new(encoding.clone()));
        let registry = MarkerRegistry::new(icons, config.icon_size, config.icon_style);
        let clusters = ClusterAggregator::new(config.cluster, ClusterBadgeRenderer::new(encoding));

        let mediator = Arc::new(InteractionMediator::new(
            MediatorPorts {
                surface: Arc::clone(&ports.surface),
                repository: Arc::clone(&ports.repository),
                session: ports.session,
                notifications: ports.notifications,
                navigation: ports.navigation,
            },
            registry.saved_places(),
            MediatorConfig {
                directions_base: config.directions_base,
                pan_offset: config.pan_offset,
            },
        ));
        let interceptor = ProviderClickInterceptor::new(
            clock,
            ports.place_details,
            Arc::clone(&mediator),
            ClickInterceptorConfig {
                dedup_window: config.dedup_window,
                lookup_timeout: config.details_timeout,
            },
        );

        Self {
            surface: ports.surface,
            repository: ports.repository,
            mediator,
            interceptor,
            pan_offset: config.pan_offset,
            layer: Mutex::new(MarkerLayer { registry, clusters }),
        }
    }

    /// Make the map show exactly the drawable subset of `records`.
    pub fn update_location_markers(&self, records: &[LocationRecord]) -> ReconcileReport {
        let mut layer = self.lock();
        self.reconcile_locked(&mut layer, records)
    }

    /// Remove every marker and badge. Returns the number of markers removed.
    pub fn clear_location_markers(&self) -> usize {
        let mut layer = self.lock();
        self.mediator.discard_marker_session();
        layer.clusters.clear(self.surface.as_ref());
        layer.registry.clear(self.surface.as_ref())
    }

    /// Fetch every saved location and reconcile the map with it.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the map is left unchanged.
    pub async fn refresh_from_repository(
        &self,
    ) -> Result<ReconcileReport, LocationRepositoryError> {
        let records = self.repository.get_all_locations().await.map_err(|error| {
            warn!(error = %error, kind = error.kind(), "loading saved locations failed");
            error
        })?;
        Ok(self.update_location_markers(&records))
    }

    /// Flip clustering on or off and re-render. Returns the new state.
    pub fn toggle_clustering(&self) -> bool {
        let mut layer = self.lock();
        let MarkerLayer { registry, clusters } = &mut *layer;
        let enabled = clusters.toggle(registry.markers(), self.surface.as_ref());
        info!(enabled, "toggled clustering");
        enabled
    }

    /// Re-cluster after the map was zoomed or panned.
    pub fn on_viewport_changed(&self) -> ClusterSnapshot {
        let mut layer = self.lock();
        let MarkerLayer { registry, clusters } = &mut *layer;
        clusters.render(registry.markers(), self.surface.as_ref())
    }

    /// Handle a click on an overlay marker the engine placed.
    pub fn on_marker_click(&self, handle: MarkerHandle) -> MarkerClickOutcome {
        let mut layer = self.lock();
        if let Some(record) = layer.registry.record_for(handle).cloned() {
            let session = self
                .mediator
                .open(InteractionTarget::SavedLocation { handle, record });
            return MarkerClickOutcome::Opened(session);
        }
        let Some(bounds) = layer
            .clusters
            .cluster_for_badge(handle)
            .map(|cluster| cluster.bounds)
        else {
            return MarkerClickOutcome::Unknown;
        };
        self.surface.fit_bounds(bounds);
        let MarkerLayer { registry, clusters } = &mut *layer;
        clusters.render(registry.markers(), self.surface.as_ref());
        MarkerClickOutcome::ClusterExpanded(bounds)
    }

    /// Handle a click on the map itself.
    pub async fn on_map_click(&self, click: MapClick) -> ClickOutcome {
        self.interceptor.handle_click(click).await
    }

    /// Handle a key press. Returns whether an overlay closed.
    pub fn on_key(&self, key: OverlayKey) -> bool {
        self.mediator.handle_key(key)
    }

    /// Run an overlay button.
    ///
    /// A successful save refreshes the markers from the backend. When that
    /// refresh fails, the saved record is merged into the current set
    /// instead.
    pub async fn perform_overlay_action(&self, action: OverlayAction) -> ActionOutcome {
        let outcome = self.mediator.perform(action).await;
        if let ActionOutcome::Save(SaveOutcome::Saved(record)) = &outcome {
            self.after_save(record).await;
        }
        outcome
    }

    /// Open the overlay for a saved location's marker.
    pub fn show_location_info_window(
        &self,
        handle: MarkerHandle,
        record: &LocationRecord,
    ) -> InteractionSession {
        self.mediator.open(InteractionTarget::SavedLocation {
            handle,
            record: record.clone(),
        })
    }

    /// Centre on a saved location and open its overlay.
    pub fn show_saved_location(&self, place_id: &PlaceId) -> Option<InteractionSession> {
        let layer = self.lock();
        let handle = layer.registry.handle_for(place_id)?;
        let marker = layer.registry.marker_for(handle)?;
        self.surface.center_on(marker.position, Some(self.pan_offset));
        Some(self.mediator.open(InteractionTarget::SavedLocation {
            handle,
            record: marker.record.clone(),
        }))
    }

    /// Close the open overlay. Returns whether one was open.
    pub fn close_current_info_window(&self) -> bool {
        self.mediator.close(CloseReason::Programmatic)
    }

    /// Whether `place_id` is saved.
    pub fn is_saved(&self, place_id: &PlaceId) -> bool {
        self.saved_places().contains(place_id)
    }

    /// Shared view of the saved identifiers.
    pub fn saved_places(&self) -> SavedPlaceIndex {
        self.lock().registry.saved_places()
    }

    /// The open overlay session, if any.
    pub fn current_session(&self) -> Option<InteractionSession> {
        self.mediator.current()
    }

    /// Clustering state after the last render.
    pub fn cluster_snapshot(&self) -> ClusterSnapshot {
        self.lock().clusters.snapshot().clone()
    }

    /// Handle of the marker drawn for `place_id`.
    pub fn marker_handle(&self, place_id: &PlaceId) -> Option<MarkerHandle> {
        self.lock().registry.handle_for(place_id)
    }

    /// Number of location markers drawn.
    pub fn marker_count(&self) -> usize {
        self.lock().registry.len()
    }

    async fn after_save(&self, record: &LocationRecord) {
        if self.refresh_from_repository().await.is_err() {
            let mut layer = self.lock();
            let mut records = layer.registry.records().to_vec();
            if !records.iter().any(|known| known.place_id == record.place_id) {
                records.push(record.clone());
            }
            self.reconcile_locked(&mut layer, &records);
        }
        self.reattach_saved_place(record);
    }

    /// Move an overlay showing a just-saved provider place onto its new
    /// marker.
    fn reattach_saved_place(&self, record: &LocationRecord) {
        let showing_place = self.mediator.current().is_some_and(|session| {
            !session.target.is_saved_location() && session.target.place_id() == &record.place_id
        });
        if !showing_place {
            return;
        }
        let layer = self.lock();
        let Some(handle) = layer.registry.handle_for(&record.place_id) else {
            return;
        };
        let record = layer
            .registry
            .record_for(handle)
            .cloned()
            .unwrap_or_else(|| record.clone());
        self.mediator
            .open(InteractionTarget::SavedLocation { handle, record });
    }

    fn reconcile_locked(
        &self,
        layer: &mut MarkerLayer,
        records: &[LocationRecord],
    ) -> ReconcileReport {
        let closed_overlay = self.mediator.discard_marker_session();
        let surface = self.surface.as_ref();
        let markers = layer.registry.reconcile(records, surface);
        let clusters = layer.clusters.render(layer.registry.markers(), surface);
        ReconcileReport {
            markers,
            clusters,
            closed_overlay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MarkerLayer> {
        self.layer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
