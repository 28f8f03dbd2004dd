//! Count badges for marker clusters.

use tracing::warn;

use crate::domain::geometry::ScreenPoint;

use super::encoding::IconEncoding;
use super::svg::badge_markup;
use super::IconImage;

/// Density tier of a cluster badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BadgeTier {
    /// 2 to 9 members.
    Few,
    /// 10 to 24 members.
    Several,
    /// 25 to 49 members.
    Dozens,
    /// 50 to 99 members.
    Many,
    /// 100 or more members.
    Massive,
}

impl BadgeTier {
    /// Tier for `count` members, or `None` below two.
    pub const fn for_count(count: usize) -> Option<Self> {
        match count {
            0 | 1 => None,
            2..=9 => Some(Self::Few),
            10..=24 => Some(Self::Several),
            25..=49 => Some(Self::Dozens),
            50..=99 => Some(Self::Many),
            _ => Some(Self::Massive),
        }
    }

    /// Badge fill colour.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Few => "#4285F4",
            Self::Several => "#34A853",
            Self::Dozens => "#FBBC05",
            Self::Many => "#EA4335",
            Self::Massive => "#7B1FA2",
        }
    }

    /// Badge edge length in pixels.
    pub const fn size_px(self) -> u32 {
        match self {
            Self::Few => 40,
            Self::Several => 44,
            Self::Dozens => 48,
            Self::Many => 52,
            Self::Massive => 56,
        }
    }
}

/// A rendered cluster badge.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterBadge {
    /// Number of members.
    pub count: usize,
    /// Density tier.
    pub tier: BadgeTier,
    /// Exact member count as text.
    pub label: String,
    /// Encoded badge.
    pub image: IconImage,
}

/// Renders count badges through the shared encoder chain.
#[derive(Debug, Clone, Default)]
pub struct ClusterBadgeRenderer {
    encoding: IconEncoding,
}

impl ClusterBadgeRenderer {
    /// Renderer using `encoding`.
    pub const fn new(encoding: IconEncoding) -> Self {
        Self { encoding }
    }

    /// Render a badge for `count` members.
    ///
    /// Returns `None` for fewer than two members or when encoding fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::icons::{BadgeTier, ClusterBadgeRenderer};
    ///
    /// let badge = ClusterBadgeRenderer::default().render(37).expect("badge");
    /// assert_eq!(badge.tier, BadgeTier::Dozens);
    /// assert_eq!(badge.label, "37");
    /// ```
    pub fn render(&self, count: usize) -> Option<ClusterBadge> {
        let tier = BadgeTier::for_count(count)?;
        let label = count.to_string();
        let size = tier.size_px();
        let markup = badge_markup(&label, tier.color(), size);
        match self.encoding.encode(&markup) {
            Ok(data_uri) => Some(ClusterBadge {
                count,
                tier,
                label,
                image: IconImage {
                    markup,
                    data_uri,
                    width: size,
                    height: size,
                    anchor: ScreenPoint {
                        x: f64::from(size) / 2.0,
                        y: f64::from(size) / 2.0,
                    },
                },
            }),
            Err(error) => {
                warn!(count, error = %error, "cluster badge encoding failed");
                None
            }
        }
    }
}
