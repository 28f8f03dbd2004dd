//! Saved-location records and their identifiers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::LocationCategory;
use super::geometry::LatLng;

/// Validation errors for [`PlaceId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceIdValidationError {
    /// The identifier was empty or whitespace.
    #[error("place id must not be empty")]
    Empty,
}

/// Stable identifier of a place, shared between saved records and provider
/// places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Validate and construct an identifier. Surrounding whitespace is
    /// trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::PlaceId;
    ///
    /// let id = PlaceId::new("  ChIJ123 ").expect("valid id");
    /// assert_eq!(id.as_str(), "ChIJ123");
    /// assert!(PlaceId::new("   ").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, PlaceIdValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlaceIdValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = PlaceIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlaceId> for String {
    fn from(value: PlaceId) -> Self {
        value.0
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal address of a location. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Single-line address as supplied by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    /// Street and house number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Town or city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Postal or ZIP code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Country name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// A single display line.
    ///
    /// Uses `formatted` when present, otherwise joins the non-empty parts
    /// with commas. Returns `None` when nothing is known.
    pub fn display_line(&self) -> Option<String> {
        let formatted = self
            .formatted
            .as_deref()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        if let Some(formatted) = formatted {
            return Some(formatted.to_owned());
        }
        let parts: Vec<&str> = [&self.street, &self.city, &self.postal_code, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// A user-saved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Identifier, unique within the saved set.
    pub place_id: PlaceId,
    /// Display name.
    pub name: String,
    /// Category used for styling.
    #[serde(default)]
    pub category: LocationCategory,
    /// Position; records without one are never drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LatLng>,
    /// Postal address.
    #[serde(default)]
    pub address: Address,
    /// How to get in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// Parking notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    /// Accessibility notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
    /// When the backend stored the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LocationRecord {
    /// Minimal record with only the required fields set.
    pub fn new(place_id: PlaceId, name: impl Into<String>, category: LocationCategory) -> Self {
        Self {
            place_id,
            name: name.into(),
            category,
            position: None,
            address: Address::default(),
            entry_point: None,
            parking: None,
            accessibility: None,
            created_at: None,
        }
    }

    /// Builder-style position setter.
    #[must_use]
    pub fn with_position(mut self, position: LatLng) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder-style address setter.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Whether the record can be drawn on the map.
    pub const fn has_position(&self) -> bool {
        self.position.is_some()
    }
}

/// Payload for persisting a newly saved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLocationRequest {
    /// Identifier of the place being saved.
    pub place_id: PlaceId,
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: LocationCategory,
    /// Position of the place.
    pub position: LatLng,
    /// Postal address, possibly empty.
    #[serde(default)]
    pub address: Address,
    /// How to get in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// Parking notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    /// Accessibility notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<String>,
}

impl SaveLocationRequest {
    /// Request with an empty address and no access notes.
    pub fn new(
        place_id: PlaceId,
        name: impl Into<String>,
        category: LocationCategory,
        position: LatLng,
    ) -> Self {
        Self {
            place_id,
            name: name.into(),
            category,
            position,
            address: Address::default(),
            entry_point: None,
            parking: None,
            accessibility: None,
        }
    }

    /// Builder-style address setter.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}
