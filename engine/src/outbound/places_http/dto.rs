//! DTOs for decoding place-detail responses.

use serde::Deserialize;

use crate::domain::geometry::LatLng;
use crate::domain::location::PlaceId;
use crate::domain::ports::PlaceDetails;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaceDetailsDto {
    #[serde(default)]
    pub(super) display_name: Option<LocalizedTextDto>,
    #[serde(default)]
    pub(super) formatted_address: Option<String>,
    #[serde(default)]
    pub(super) types: Vec<String>,
    #[serde(default)]
    pub(super) location: Option<LocationDto>,
    #[serde(default)]
    pub(super) rating: Option<f64>,
    #[serde(default)]
    pub(super) user_rating_count: Option<u32>,
    #[serde(default)]
    pub(super) regular_opening_hours: Option<OpeningHoursDto>,
    #[serde(default)]
    pub(super) website_uri: Option<String>,
    #[serde(default)]
    pub(super) national_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocalizedTextDto {
    pub(super) text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationDto {
    pub(super) latitude: f64,
    pub(super) longitude: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OpeningHoursDto {
    #[serde(default)]
    pub(super) open_now: Option<bool>,
    #[serde(default)]
    pub(super) weekday_descriptions: Vec<String>,
}

impl PlaceDetailsDto {
    /// Map into domain details for the place that was requested.
    pub(super) fn into_domain_details(self, place_id: PlaceId) -> PlaceDetails {
        let hours = self.regular_opening_hours.unwrap_or_default();
        PlaceDetails {
            name: self.display_name.map(|name| name.text),
            formatted_address: self.formatted_address,
            types: self.types,
            position: self
                .location
                .and_then(|location| LatLng::new(location.latitude, location.longitude).ok()),
            rating: self.rating.filter(|rating| rating.is_finite()),
            user_rating_count: self.user_rating_count,
            open_now: hours.open_now,
            weekday_hours: hours.weekday_descriptions,
            website: self.website_uri,
            phone_number: self.national_phone_number,
            ..PlaceDetails::new(place_id)
        }
    }
}
