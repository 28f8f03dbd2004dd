//! Engine settings loaded via OrthoConfig.
//!
//! Values come from the command line, `PLACEMARKS_*` environment variables
//! or a configuration file, in that order of precedence. They are converted
//! into a typed [`MarkerEngineConfig`] before the engine sees them.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::domain::clustering::ClusterConfig;
use crate::domain::geometry::ScreenOffset;
use crate::domain::icons::IconStyle;
use crate::domain::marker_engine::MarkerEngineConfig;

/// Raw settings controlling marker rendering and interaction.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLACEMARKS")]
pub struct EngineSettings {
    /// Group nearby markers into cluster badges.
    #[ortho_config(default = true)]
    pub clustering_enabled: bool,
    /// Grouping radius in screen pixels.
    #[ortho_config(default = 60)]
    pub cluster_radius_px: u32,
    /// Smallest group drawn as a badge.
    #[ortho_config(default = 2)]
    pub cluster_min_size: usize,
    /// Zoom level from which clustering is suppressed.
    #[ortho_config(default = 15)]
    pub cluster_max_zoom: u8,
    /// Marker icon edge length in pixels.
    #[ortho_config(default = 32)]
    pub icon_size_px: u32,
    /// Draw marker icons with a gradient and drop shadow.
    #[ortho_config(default = false)]
    pub emphasis_icons: bool,
    /// Repeated clicks on one place inside this window are ignored.
    #[ortho_config(default = 500)]
    pub click_dedup_window_ms: u64,
    /// Upper bound on a place-detail lookup.
    #[ortho_config(default = 5000)]
    pub details_timeout_ms: u64,
    /// How far the map pans up after centring, so the overlay stays in view.
    #[ortho_config(default = 100)]
    pub overlay_pan_offset_px: u32,
    /// Directions endpoint override.
    pub directions_base_url: Option<String>,
    /// Longest data URI an icon may encode to.
    #[ortho_config(default = 65536)]
    pub max_icon_data_uri_bytes: usize,
}

impl EngineSettings {
    /// Typed engine configuration.
    ///
    /// An unparsable directions URL is logged and replaced by the default
    /// endpoint.
    pub fn engine_config(&self) -> MarkerEngineConfig {
        MarkerEngineConfig {
            cluster: ClusterConfig {
                enabled: self.clustering_enabled,
                radius_px: self.cluster_radius_px,
                min_cluster_size: self.cluster_min_size,
                max_zoom: self.cluster_max_zoom,
            },
            icon_size: self.icon_size_px,
            icon_style: if self.emphasis_icons {
                IconStyle::Emphasis
            } else {
                IconStyle::Standard
            },
            max_icon_data_uri_bytes: self.max_icon_data_uri_bytes,
            dedup_window: Duration::from_millis(self.click_dedup_window_ms),
            details_timeout: Duration::from_millis(self.details_timeout_ms),
            pan_offset: ScreenOffset {
                dx: 0,
                dy: -i32::try_from(self.overlay_pan_offset_px).unwrap_or(i32::MAX),
            },
            directions_base: self.directions_base(),
        }
    }

    fn directions_base(&self) -> Option<Url> {
        let raw = self.directions_base_url.as_deref()?;
        match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(url = raw, %error, "ignoring invalid directions base URL");
                None
            }
        }
    }
}
