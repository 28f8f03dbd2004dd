//! Spatial clustering of location markers.
//!
//! Groups are recomputed from scratch on every render. A render first
//! removes every badge it placed before, so toggling or re-rendering never
//! leaves stale badges behind.

mod algorithm;

use std::sync::Arc;

use tracing::{info, warn};

use super::geometry::{GeoBounds, LatLng, ScreenPoint};
use super::icons::ClusterBadgeRenderer;
use super::location::PlaceId;
use super::marker_registry::RegisteredMarker;
use super::ports::{MapSurface, MarkerHandle, MarkerKind, MarkerPlacement};

pub use algorithm::{ClusterAlgorithm, DistanceClusterAlgorithm};

/// Stacking order for cluster badges.
pub const CLUSTER_BADGE_Z_INDEX: i32 = 1_000;

/// Clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Whether clustering is switched on.
    pub enabled: bool,
    /// Grouping radius in screen pixels.
    pub radius_px: u32,
    /// Smallest group rendered as a badge. Values below two act as two.
    pub min_cluster_size: usize,
    /// Zoom level from which clustering is suppressed.
    pub max_zoom: u8,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius_px: 60,
            min_cluster_size: 2,
            max_zoom: 15,
        }
    }
}

/// Why markers are or are not grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusterMode {
    /// Groups were computed.
    Clustered,
    /// Clustering is switched off.
    #[default]
    Disabled,
    /// The map is zoomed in past `max_zoom`.
    SuppressedByZoom,
    /// No grouping algorithm is available.
    Unavailable,
}

impl ClusterMode {
    /// Stable name for structured traces.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clustered => "clustered",
            Self::Disabled => "disabled",
            Self::SuppressedByZoom => "suppressed_by_zoom",
            Self::Unavailable => "unavailable",
        }
    }
}

/// One rendered cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterGroup {
    /// Badge marker handle.
    pub badge: MarkerHandle,
    /// Hidden member markers.
    pub members: Vec<MarkerHandle>,
    /// Identifiers of the members, in member order.
    pub place_ids: Vec<PlaceId>,
    /// Mean member position, where the badge sits.
    pub center: LatLng,
    /// Box enclosing all members.
    pub bounds: GeoBounds,
    /// Number of members.
    pub count: usize,
}

/// Result of the last render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSnapshot {
    /// Rendered clusters.
    pub clusters: Vec<ClusterGroup>,
    /// Markers shown on their own.
    pub individual_markers: Vec<MarkerHandle>,
    /// Markers hidden behind a badge.
    pub clustered_markers: Vec<MarkerHandle>,
    /// Mode the render ran in.
    pub mode: ClusterMode,
}

/// Groups registry markers into count badges.
#[derive(Debug)]
pub struct ClusterAggregator {
    config: ClusterConfig,
    algorithm: Option<Arc<dyn ClusterAlgorithm>>,
    badges: ClusterBadgeRenderer,
    snapshot: ClusterSnapshot,
}

impl ClusterAggregator {
    /// Aggregator using [`DistanceClusterAlgorithm`].
    pub fn new(config: ClusterConfig, badges: ClusterBadgeRenderer) -> Self {
        Self::with_algorithm(config, badges, Some(Arc::new(DistanceClusterAlgorithm)))
    }

    /// Aggregator with an explicit algorithm; `None` degrades to showing
    /// every marker.
    pub fn with_algorithm(
        config: ClusterConfig,
        badges: ClusterBadgeRenderer,
        algorithm: Option<Arc<dyn ClusterAlgorithm>>,
    ) -> Self {
        Self {
            config,
            algorithm,
            badges,
            snapshot: ClusterSnapshot::default(),
        }
    }

    /// Current parameters.
    pub const fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Whether clustering is switched on.
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Result of the last render.
    pub const fn snapshot(&self) -> &ClusterSnapshot {
        &self.snapshot
    }

    /// Cluster drawn behind `badge`.
    pub fn cluster_for_badge(&self, badge: MarkerHandle) -> Option<&ClusterGroup> {
        self.snapshot
            .clusters
            .iter()
            .find(|cluster| cluster.badge == badge)
    }

    /// Flip clustering on or off and re-render. Returns the new state.
    pub fn toggle(&mut self, markers: &[RegisteredMarker], surface: &dyn MapSurface) -> bool {
        self.config.enabled = !self.config.enabled;
        self.render(markers, surface);
        self.config.enabled
    }

    /// Remove every badge this aggregator placed.
    ///
    /// Member markers are left as they are; callers clearing the registry
    /// detach them separately.
    pub fn clear(&mut self, surface: &dyn MapSurface) -> usize {
        let removed = self.remove_badges(surface);
        self.snapshot = ClusterSnapshot {
            mode: self.snapshot.mode,
            ..ClusterSnapshot::default()
        };
        removed
    }

    /// Recompute groups for the current zoom and viewport and update the
    /// surface.
    pub fn render(
        &mut self,
        markers: &[RegisteredMarker],
        surface: &dyn MapSurface,
    ) -> ClusterSnapshot {
        self.remove_badges(surface);

        let zoom = surface.current_zoom();
        let mode = self.mode_for(zoom);
        let snapshot = match (&self.algorithm, mode) {
            (Some(algorithm), ClusterMode::Clustered) => {
                let algorithm = Arc::clone(algorithm);
                self.render_clusters(algorithm.as_ref(), markers, surface)
            }
            _ => show_all(markers, surface, mode),
        };

        info!(
            mode = snapshot.mode.as_str(),
            zoom,
            clusters = snapshot.clusters.len(),
            clustered = snapshot.clustered_markers.len(),
            individual = snapshot.individual_markers.len(),
            "rendered marker clusters"
        );
        self.snapshot = snapshot.clone();
        snapshot
    }

    fn mode_for(&self, zoom: f64) -> ClusterMode {
        if !self.config.enabled {
            ClusterMode::Disabled
        } else if zoom >= f64::from(self.config.max_zoom) {
            ClusterMode::SuppressedByZoom
        } else if self.algorithm.is_none() {
            ClusterMode::Unavailable
        } else {
            ClusterMode::Clustered
        }
    }

    fn render_clusters(
        &self,
        algorithm: &dyn ClusterAlgorithm,
        markers: &[RegisteredMarker],
        surface: &dyn MapSurface,
    ) -> ClusterSnapshot {
        let viewport = surface.current_viewport_bounds();
        let mut snapshot = ClusterSnapshot {
            mode: ClusterMode::Clustered,
            ..ClusterSnapshot::default()
        };

        let mut candidates: Vec<&RegisteredMarker> = Vec::with_capacity(markers.len());
        let mut points: Vec<ScreenPoint> = Vec::with_capacity(markers.len());
        for marker in markers {
            let in_view = viewport.is_none_or(|bounds| bounds.contains(&marker.position));
            match surface.project_to_screen(marker.position).filter(|_| in_view) {
                Some(point) => {
                    candidates.push(marker);
                    points.push(point);
                }
                None => snapshot.individual_markers.push(marker.handle),
            }
        }

        let min_size = self.config.min_cluster_size.max(2);
        for group in algorithm.group(&points, f64::from(self.config.radius_px)) {
            let members: Vec<&RegisteredMarker> = group
                .iter()
                .filter_map(|index| candidates.get(*index).copied())
                .collect();
            if members.len() < min_size {
                snapshot
                    .individual_markers
                    .extend(members.iter().map(|marker| marker.handle));
                continue;
            }
            match self.place_cluster(&members, surface) {
                Some(cluster) => {
                    for member in &members {
                        surface.set_marker_visible(member.handle, false);
                    }
                    snapshot.clustered_markers.extend(cluster.members.iter().copied());
                    snapshot.clusters.push(cluster);
                }
                None => snapshot
                    .individual_markers
                    .extend(members.iter().map(|marker| marker.handle)),
            }
        }

        for handle in &snapshot.individual_markers {
            surface.set_marker_visible(*handle, true);
        }
        snapshot
    }

    fn place_cluster(
        &self,
        members: &[&RegisteredMarker],
        surface: &dyn MapSurface,
    ) -> Option<ClusterGroup> {
        let positions: Vec<LatLng> = members.iter().map(|marker| marker.position).collect();
        let center = LatLng::centroid(&positions)?;
        let bounds = GeoBounds::around(&positions)?;
        let count = members.len();
        let badge = self.badges.render(count)?;

        let placement = MarkerPlacement {
            position: center,
            title: format!("{count} saved places"),
            icon: badge.image,
            kind: MarkerKind::ClusterBadge,
            z_index: CLUSTER_BADGE_Z_INDEX,
        };
        match surface.place_overlay_marker(&placement) {
            Ok(handle) => Some(ClusterGroup {
                badge: handle,
                members: members.iter().map(|marker| marker.handle).collect(),
                place_ids: members.iter().map(|marker| marker.place_id.clone()).collect(),
                center,
                bounds,
                count,
            }),
            Err(error) => {
                warn!(
                    count,
                    error = %error,
                    kind = error.kind(),
                    "map surface refused cluster badge; showing members"
                );
                None
            }
        }
    }

    fn remove_badges(&mut self, surface: &dyn MapSurface) -> usize {
        let clusters = std::mem::take(&mut self.snapshot.clusters);
        for cluster in &clusters {
            surface.remove_overlay_marker(cluster.badge);
        }
        clusters.len()
    }
}

fn show_all(
    markers: &[RegisteredMarker],
    surface: &dyn MapSurface,
    mode: ClusterMode,
) -> ClusterSnapshot {
    for marker in markers {
        surface.set_marker_visible(marker.handle, true);
    }
    ClusterSnapshot {
        clusters: Vec::new(),
        individual_markers: markers.iter().map(|marker| marker.handle).collect(),
        clustered_markers: Vec::new(),
        mode,
    }
}
