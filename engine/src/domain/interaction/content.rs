//! Overlay content derived from an interaction target.
//!
//! Content is rebuilt on every open; nothing is carried over from a previous
//! session.

use crate::domain::category::LocationCategory;

use super::session::{InteractionTarget, OverlayAction, SyntheticPlace};

/// Title used when a target has a blank name.
const UNNAMED_TITLE: &str = "Unnamed place";

/// One labelled line in an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayDetail {
    /// Field caption.
    pub label: &'static str,
    /// Field value.
    pub value: String,
}

impl OverlayDetail {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Structured overlay content handed to the map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayContent {
    /// Heading.
    pub title: String,
    /// Single-line address.
    pub address: Option<String>,
    /// Category of the target.
    pub category: LocationCategory,
    /// Category caption.
    pub category_label: &'static str,
    /// Swatch colour, identical to the marker fill.
    pub category_color: &'static str,
    /// Extra labelled lines.
    pub details: Vec<OverlayDetail>,
    /// Buttons, in display order.
    pub actions: Vec<OverlayAction>,
    /// Whether the target is in the saved set.
    pub saved: bool,
}

impl OverlayContent {
    /// Content for `target`. `saved` marks provider places that are already
    /// in the saved set.
    pub fn for_target(target: &InteractionTarget, saved: bool) -> Self {
        match target {
            InteractionTarget::SavedLocation { record, .. } => {
                let details = [
                    ("Entry point", &record.entry_point),
                    ("Parking", &record.parking),
                    ("Accessibility", &record.accessibility),
                ]
                .into_iter()
                .filter_map(|(label, value)| {
                    non_blank(value.as_deref()).map(|value| OverlayDetail::new(label, value))
                })
                .collect();
                Self::assemble(
                    &record.name,
                    record.address.display_line(),
                    record.category,
                    details,
                    true,
                )
            }
            InteractionTarget::Place(place) => Self::assemble(
                &place.name,
                place.address.clone(),
                place.category,
                place_details(place),
                saved,
            ),
        }
    }

    fn assemble(
        name: &str,
        address: Option<String>,
        category: LocationCategory,
        details: Vec<OverlayDetail>,
        saved: bool,
    ) -> Self {
        let actions = if saved {
            vec![
                OverlayAction::Directions,
                OverlayAction::Center,
                OverlayAction::Close,
            ]
        } else {
            vec![
                OverlayAction::Save,
                OverlayAction::Directions,
                OverlayAction::Close,
            ]
        };
        Self {
            title: non_blank(Some(name)).unwrap_or(UNNAMED_TITLE).to_owned(),
            address: address.filter(|line| !line.trim().is_empty()),
            category,
            category_label: category.display_name(),
            category_color: category.color(),
            details,
            actions,
            saved,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn place_details(place: &SyntheticPlace) -> Vec<OverlayDetail> {
    let mut details = Vec::new();
    if let Some(rating) = place.rating {
        let value = match place.user_rating_count {
            Some(count) => format!("{rating:.1} ({count} reviews)"),
            None => format!("{rating:.1}"),
        };
        details.push(OverlayDetail::new("Rating", value));
    }
    if let Some(open_now) = place.open_now {
        let value = if open_now { "Open now" } else { "Closed now" };
        details.push(OverlayDetail::new("Status", value));
    }
    if !place.weekday_hours.is_empty() {
        details.push(OverlayDetail::new("Hours", place.weekday_hours.join("\n")));
    }
    if let Some(phone) = non_blank(place.phone_number.as_deref()) {
        details.push(OverlayDetail::new("Phone", phone));
    }
    if let Some(website) = non_blank(place.website.as_deref()) {
        details.push(OverlayDetail::new("Website", website));
    }
    details
}
