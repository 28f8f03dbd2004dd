//! Marker icon rendering.
//!
//! [`IconFactory`] turns a category into an encoded SVG icon. It is a pure
//! function over static tables; the descriptor cache only saves work.
//!
//! Public surface:
//! - [`IconFactory`] and [`IconDescriptor`] for location markers.
//! - [`ClusterBadgeRenderer`] and [`ClusterBadge`] for cluster counts.
//! - [`IconEncoding`] and the [`IconEncoder`] trait for data-URI encoding.

mod badge;
mod encoding;
mod svg;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use super::category::LocationCategory;
use super::geometry::ScreenPoint;

pub use badge::{BadgeTier, ClusterBadge, ClusterBadgeRenderer};
pub use encoding::{
    Base64SvgEncoder, DEFAULT_MAX_DATA_URI_BYTES, IconEncoder, IconEncoding, IconEncodingError,
    PercentSvgEncoder,
};

/// Size used when a caller asks for zero pixels.
pub const DEFAULT_ICON_SIZE: u32 = 32;
/// Largest icon the factory renders.
pub const MAX_ICON_SIZE: u32 = 256;

/// Visual emphasis of a marker icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IconStyle {
    /// Flat disc with a white stroke.
    #[default]
    Standard,
    /// Radial gradient fill with a drop shadow.
    Emphasis,
}

/// An encoded image ready to hand to the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// SVG source.
    pub markup: String,
    /// Encoded data URI.
    pub data_uri: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel inside the image that sits on the marker position.
    pub anchor: ScreenPoint,
}

/// A rendered category icon.
#[derive(Debug, Clone, PartialEq)]
pub struct IconDescriptor {
    /// Category the icon was rendered for.
    pub category: LocationCategory,
    /// Fill colour.
    pub color: &'static str,
    /// Two-letter fallback label.
    pub label: &'static str,
    /// Style variant.
    pub style: IconStyle,
    /// Whether the pulsing ring is drawn.
    pub live: bool,
    /// Encoded image.
    pub image: IconImage,
}

type IconKey = (LocationCategory, u32, IconStyle);

/// Renders and caches category icons.
#[derive(Debug, Default)]
pub struct IconFactory {
    encoding: IconEncoding,
    cache: Mutex<HashMap<IconKey, Arc<IconDescriptor>>>,
}

impl IconFactory {
    /// Factory using `encoding` for data URIs.
    pub fn new(encoding: IconEncoding) -> Self {
        Self {
            encoding,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replace zero with the default size and clamp to the maximum.
    pub const fn normalise_size(size_px: u32) -> u32 {
        match size_px {
            0 => DEFAULT_ICON_SIZE,
            size if size > MAX_ICON_SIZE => MAX_ICON_SIZE,
            size => size,
        }
    }

    /// Icon for `category`.
    ///
    /// Returns `None` when both encoders fail; the caller should skip the
    /// marker.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::LocationCategory;
    /// use placemarks::domain::icons::{IconFactory, IconStyle};
    ///
    /// let factory = IconFactory::default();
    /// let icon = factory
    ///     .icon(LocationCategory::Park, 0, IconStyle::Standard)
    ///     .expect("icon renders");
    /// assert_eq!(icon.image.width, 32);
    /// assert_eq!(icon.color, "#27AE60");
    /// ```
    pub fn icon(
        &self,
        category: LocationCategory,
        size_px: u32,
        style: IconStyle,
    ) -> Option<Arc<IconDescriptor>> {
        let size = Self::normalise_size(size_px);
        let key = (category, size, style);
        if let Some(hit) = self.lock_cache().get(&key) {
            return Some(Arc::clone(hit));
        }

        let descriptor = Arc::new(self.render(category, size, style)?);
        self.lock_cache().insert(key, Arc::clone(&descriptor));
        Some(descriptor)
    }

    /// Icon for a free-text category label.
    pub fn icon_for_label(
        &self,
        label: Option<&str>,
        size_px: u32,
        style: IconStyle,
    ) -> Option<Arc<IconDescriptor>> {
        self.icon(LocationCategory::parse(label), size_px, style)
    }

    /// Encoder chain shared with badge rendering.
    pub const fn encoding(&self) -> &IconEncoding {
        &self.encoding
    }

    /// Number of cached descriptors.
    pub fn cached_len(&self) -> usize {
        self.lock_cache().len()
    }

    /// Drop every cached descriptor.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn render(
        &self,
        category: LocationCategory,
        size: u32,
        style: IconStyle,
    ) -> Option<IconDescriptor> {
        let markup = svg::marker_markup(category, size, style);
        let data_uri = match self.encoding.encode(&markup) {
            Ok(uri) => uri,
            Err(error) => {
                warn!(
                    category = %category,
                    size_px = size,
                    error = %error,
                    "icon encoding failed; marker will be skipped"
                );
                return None;
            }
        };
        let half = f64::from(size) / 2.0;
        Some(IconDescriptor {
            category,
            color: category.color(),
            label: category.label(),
            style,
            live: category.is_live(),
            image: IconImage {
                markup,
                data_uri,
                width: size,
                height: size,
                anchor: ScreenPoint { x: half, y: half },
            },
        })
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<IconKey, Arc<IconDescriptor>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
