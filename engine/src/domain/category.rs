//! Saved-location categories and their presentation attributes.
//!
//! Every attribute is an exhaustive `match`, so adding a category forces a
//! decision on its colour, label, pictogram and live flag at compile time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fill colour used for the unknown category and as the general fallback.
pub const FALLBACK_COLOR: &str = "#9E9E9E";

/// The fixed set of location categories.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum LocationCategory {
    /// Restaurants and other sit-down food places.
    Restaurant,
    /// Cafes and coffee shops.
    Cafe,
    /// Bars and pubs.
    Bar,
    /// Hotels and other lodging.
    Hotel,
    /// Shops and stores.
    Shop,
    /// Fuel stations.
    GasStation,
    /// Car parks.
    Parking,
    /// Hospitals and clinics.
    Hospital,
    /// Schools and universities.
    School,
    /// Parks and gardens.
    Park,
    /// Museums and galleries.
    Museum,
    /// Offices and workplaces.
    Office,
    /// Homes and residential buildings.
    Residence,
    /// Live events.
    Event,
    /// Live music.
    Concert,
    /// Anything not recognised.
    #[default]
    Unknown,
}

impl LocationCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Restaurant,
        Self::Cafe,
        Self::Bar,
        Self::Hotel,
        Self::Shop,
        Self::GasStation,
        Self::Parking,
        Self::Hospital,
        Self::School,
        Self::Park,
        Self::Museum,
        Self::Office,
        Self::Residence,
        Self::Event,
        Self::Concert,
        Self::Unknown,
    ];

    /// Parse a free-text category label.
    ///
    /// Matching is case-insensitive and treats spaces and dashes like
    /// underscores. Missing, empty or unrecognised labels map to
    /// [`LocationCategory::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::LocationCategory;
    ///
    /// assert_eq!(LocationCategory::parse(Some("Gas Station")), LocationCategory::GasStation);
    /// assert_eq!(LocationCategory::parse(Some("coffee")), LocationCategory::Cafe);
    /// assert_eq!(LocationCategory::parse(None), LocationCategory::Unknown);
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unknown;
        };
        let normalised: String = raw
            .trim()
            .chars()
            .flat_map(|ch| match ch {
                ' ' | '-' => '_'.to_lowercase(),
                other => other.to_lowercase(),
            })
            .collect();
        match normalised.as_str() {
            "restaurant" | "food" | "diner" => Self::Restaurant,
            "cafe" | "café" | "coffee" | "coffee_shop" | "bakery" => Self::Cafe,
            "bar" | "pub" | "night_club" | "nightclub" => Self::Bar,
            "hotel" | "lodging" | "hostel" | "motel" => Self::Hotel,
            "shop" | "store" | "shopping" | "supermarket" | "grocery" => Self::Shop,
            "gas_station" | "gas" | "fuel" | "petrol_station" => Self::GasStation,
            "parking" | "car_park" | "parking_lot" => Self::Parking,
            "hospital" | "clinic" | "doctor" | "pharmacy" => Self::Hospital,
            "school" | "university" | "college" => Self::School,
            "park" | "garden" | "playground" => Self::Park,
            "museum" | "gallery" | "art_gallery" => Self::Museum,
            "office" | "work" | "workplace" | "business" => Self::Office,
            "residence" | "home" | "house" | "apartment" | "residential" => Self::Residence,
            "event" | "festival" | "live_event" => Self::Event,
            "concert" | "gig" | "live_music" => Self::Concert,
            _ => Self::Unknown,
        }
    }

    /// Map provider place-type hints to a category; the first hint that
    /// maps wins.
    pub fn from_provider_types<S: AsRef<str>>(types: &[S]) -> Self {
        types
            .iter()
            .map(|hint| Self::parse(Some(hint.as_ref())))
            .find(|category| *category != Self::Unknown)
            .unwrap_or(Self::Unknown)
    }

    /// Canonical lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Hotel => "hotel",
            Self::Shop => "shop",
            Self::GasStation => "gas_station",
            Self::Parking => "parking",
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Park => "park",
            Self::Museum => "museum",
            Self::Office => "office",
            Self::Residence => "residence",
            Self::Event => "event",
            Self::Concert => "concert",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name shown in overlays.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Cafe => "Cafe",
            Self::Bar => "Bar",
            Self::Hotel => "Hotel",
            Self::Shop => "Shop",
            Self::GasStation => "Gas station",
            Self::Parking => "Parking",
            Self::Hospital => "Hospital",
            Self::School => "School",
            Self::Park => "Park",
            Self::Museum => "Museum",
            Self::Office => "Office",
            Self::Residence => "Residence",
            Self::Event => "Event",
            Self::Concert => "Concert",
            Self::Unknown => "Other",
        }
    }

    /// Marker and overlay swatch colour.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Restaurant => "#E74C3C",
            Self::Cafe => "#8D6E63",
            Self::Bar => "#9B59B6",
            Self::Hotel => "#3498DB",
            Self::Shop => "#F39C12",
            Self::GasStation => "#E67E22",
            Self::Parking => "#2C3E50",
            Self::Hospital => "#C0392B",
            Self::School => "#16A085",
            Self::Park => "#27AE60",
            Self::Museum => "#795548",
            Self::Office => "#34495E",
            Self::Residence => "#1ABC9C",
            Self::Event => "#E91E63",
            Self::Concert => "#FF5722",
            Self::Unknown => FALLBACK_COLOR,
        }
    }

    /// Two-letter label rendered when no pictogram exists.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Restaurant => "RE",
            Self::Cafe => "CA",
            Self::Bar => "BA",
            Self::Hotel => "HO",
            Self::Shop => "SH",
            Self::GasStation => "GS",
            Self::Parking => "PA",
            Self::Hospital => "HS",
            Self::School => "SC",
            Self::Park => "PK",
            Self::Museum => "MU",
            Self::Office => "OF",
            Self::Residence => "RS",
            Self::Event => "EV",
            Self::Concert => "CO",
            Self::Unknown => "?",
        }
    }

    /// SVG path data on a 24x24 grid, for categories with a pictogram.
    pub const fn pictogram(self) -> Option<&'static str> {
        match self {
            Self::Restaurant => Some(
                "M7 2v8a2 2 0 0 0 2 2v10h2V12a2 2 0 0 0 2-2V2h-1.5v6h-1V2h-1v6h-1V2zm9 0c-1.7 0-3 2-3 5v6h2v9h2V2z",
            ),
            Self::Cafe => Some(
                "M4 6h12v6a5 5 0 0 1-5 5H9a5 5 0 0 1-5-5zm12 1.5h1.5a2.5 2.5 0 0 1 0 5H16zM4 19h14v2H4z",
            ),
            Self::Hotel => Some("M3 6v13h2v-2h14v2h2v-6a3 3 0 0 0-3-3h-7v5H5V6zm4 4a2 2 0 1 0 0.01 0z"),
            Self::Shop => Some("M6 7V6a6 6 0 0 1 12 0v1h3l-1 14H4L3 7zm2 0h8V6a4 4 0 0 0-8 0z"),
            Self::Hospital => Some("M10 3h4v7h7v4h-7v7h-4v-7H3v-4h7z"),
            Self::Park => Some("M12 2 5 13h4l-3 5h5v4h2v-4h5l-3-5h4z"),
            Self::Residence => Some("M12 3 2 12h3v9h5v-6h4v6h5v-9h3z"),
            Self::Unknown => Some(
                "M11 18h2v2h-2zm1-14a5 5 0 0 0-5 5h2a3 3 0 1 1 3 3h-1v4h2v-2.1A5 5 0 0 0 12 4z",
            ),
            Self::Bar
            | Self::GasStation
            | Self::Parking
            | Self::School
            | Self::Museum
            | Self::Office
            | Self::Event
            | Self::Concert => None,
        }
    }

    /// Whether markers for this category carry the pulsing live decoration.
    pub const fn is_live(self) -> bool {
        match self {
            Self::Event | Self::Concert => true,
            Self::Restaurant
            | Self::Cafe
            | Self::Bar
            | Self::Hotel
            | Self::Shop
            | Self::GasStation
            | Self::Parking
            | Self::Hospital
            | Self::School
            | Self::Park
            | Self::Museum
            | Self::Office
            | Self::Residence
            | Self::Unknown => false,
        }
    }
}

impl From<&str> for LocationCategory {
    fn from(value: &str) -> Self {
        Self::parse(Some(value))
    }
}

impl From<String> for LocationCategory {
    fn from(value: String) -> Self {
        Self::parse(Some(&value))
    }
}

impl From<LocationCategory> for String {
    fn from(value: LocationCategory) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for category parsing and presentation tables.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("restaurant", LocationCategory::Restaurant)]
    #[case("RESTAURANT", LocationCategory::Restaurant)]
    #[case("  Cafe ", LocationCategory::Cafe)]
    #[case("gas-station", LocationCategory::GasStation)]
    #[case("Gas Station", LocationCategory::GasStation)]
    #[case("lodging", LocationCategory::Hotel)]
    #[case("Festival", LocationCategory::Event)]
    #[case("CAFÉ", LocationCategory::Cafe)]
    #[case("Café", LocationCategory::Cafe)]
    fn parses_labels_case_insensitively(#[case] raw: &str, #[case] expected: LocationCategory) {
        assert_eq!(LocationCategory::parse(Some(raw)), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("unknown-category-xyz"))]
    fn unrecognised_labels_fall_back_to_unknown(#[case] raw: Option<&str>) {
        assert_eq!(LocationCategory::parse(raw), LocationCategory::Unknown);
    }

    #[test]
    fn canonical_labels_round_trip() {
        for category in LocationCategory::ALL {
            assert_eq!(LocationCategory::parse(Some(category.as_str())), category);
        }
    }

    #[test]
    fn provider_types_use_the_first_recognised_hint() {
        let hints = ["point_of_interest", "establishment", "night_club", "restaurant"];
        assert_eq!(
            LocationCategory::from_provider_types(&hints),
            LocationCategory::Bar
        );
        let unknown: [&str; 1] = ["point_of_interest"];
        assert_eq!(
            LocationCategory::from_provider_types(&unknown),
            LocationCategory::Unknown
        );
    }

    #[test]
    fn unknown_uses_gray_and_question_mark() {
        assert_eq!(LocationCategory::Unknown.color(), FALLBACK_COLOR);
        assert_eq!(LocationCategory::Unknown.label(), "?");
    }

    #[test]
    fn labels_are_at_most_two_characters() {
        for category in LocationCategory::ALL {
            assert!((1..=2).contains(&category.label().chars().count()));
        }
    }

    #[test]
    fn only_event_categories_are_live() {
        let live: Vec<_> = LocationCategory::ALL
            .into_iter()
            .filter(|category| category.is_live())
            .collect();
        assert_eq!(live, [LocationCategory::Event, LocationCategory::Concert]);
    }

    #[test]
    fn serialises_as_canonical_label() {
        let json = serde_json::to_string(&LocationCategory::GasStation).expect("serialise");
        assert_eq!(json, "\"gas_station\"");
        let parsed: LocationCategory = serde_json::from_str("\"Coffee Shop\"").expect("parse");
        assert_eq!(parsed, LocationCategory::Cafe);
    }
}
