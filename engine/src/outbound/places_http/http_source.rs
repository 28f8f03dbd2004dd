//! Reqwest-backed place-detail source.
//!
//! This adapter owns transport details only: the field mask header, status
//! mapping and decoding into domain details.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::PlaceDetailsDto;
use crate::domain::location::PlaceId;
use crate::domain::ports::{PlaceDetailField, PlaceDetails, PlaceDetailsError, PlaceDetailsSource};
use crate::outbound::http_body::body_preview;

/// Default Places API base.
pub const DEFAULT_PLACES_BASE: &str = "https://places.googleapis.com/v1/";

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Place-detail source issuing `GET {base}/places/{id}`.
pub struct HttpPlaceDetailsSource {
    client: Client,
    base: Url,
    api_key: String,
}

impl HttpPlaceDetailsSource {
    /// Build a source using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlaceDetailsSource for HttpPlaceDetailsSource {
    async fn lookup_place_details(
        &self,
        place_id: &PlaceId,
        fields: &[PlaceDetailField],
    ) -> Result<PlaceDetails, PlaceDetailsError> {
        let response = self
            .client
            .get(details_url(&self.base, place_id))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(FIELD_MASK_HEADER, field_mask(fields))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), place_id));
        }
        parse_details(body.as_ref(), place_id)
    }
}

fn details_url(base: &Url, place_id: &PlaceId) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("places").push(place_id.as_str());
    }
    url
}

fn field_mask(fields: &[PlaceDetailField]) -> String {
    let fields: &[PlaceDetailField] = if fields.is_empty() {
        &PlaceDetailField::OVERLAY
    } else {
        fields
    };
    fields
        .iter()
        .map(|field| field.mask_name())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_details(body: &[u8], place_id: &PlaceId) -> Result<PlaceDetails, PlaceDetailsError> {
    let decoded: PlaceDetailsDto = serde_json::from_slice(body).map_err(|error| {
        PlaceDetailsError::decode(format!("invalid place details payload: {error}"))
    })?;
    Ok(decoded.into_domain_details(place_id.clone()))
}

fn map_transport_error(error: reqwest::Error) -> PlaceDetailsError {
    if error.is_timeout() {
        PlaceDetailsError::timeout(error.to_string())
    } else {
        PlaceDetailsError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8], place_id: &PlaceId) -> PlaceDetailsError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::NOT_FOUND => PlaceDetailsError::not_found(place_id.as_str()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PlaceDetailsError::unauthorized(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PlaceDetailsError::timeout(message)
        }
        _ => PlaceDetailsError::transport(message),
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for non-network place-detail helpers.

    use super::*;
    use crate::domain::geometry::LatLng;
    use rstest::rstest;

    fn id() -> PlaceId {
        PlaceId::new("ChIJ-harbour").expect("valid id")
    }

    #[test]
    fn builds_the_details_url() {
        let base = Url::parse(DEFAULT_PLACES_BASE).expect("valid base");
        assert_eq!(
            details_url(&base, &id()).as_str(),
            "https://places.googleapis.com/v1/places/ChIJ-harbour"
        );
    }

    #[test]
    fn field_mask_lists_requested_fields() {
        let mask = field_mask(&[PlaceDetailField::DisplayName, PlaceDetailField::OpeningHours]);
        assert_eq!(mask, "displayName,regularOpeningHours");
        assert!(field_mask(&[]).starts_with("id,displayName,formattedAddress"));
    }

    #[test]
    fn decodes_place_details() {
        let body = r#"{
            "id": "ChIJ-harbour",
            "displayName": { "text": "Harbour Cafe", "languageCode": "en" },
            "formattedAddress": "1 Quay Road, Plymouth",
            "types": ["cafe", "food", "point_of_interest"],
            "location": { "latitude": 50.37, "longitude": -4.14 },
            "rating": 4.5,
            "userRatingCount": 212,
            "regularOpeningHours": {
                "openNow": true,
                "weekdayDescriptions": ["Monday: 8:00 AM - 5:00 PM"]
            },
            "websiteUri": "https://harbour.example.test",
            "nationalPhoneNumber": "01752 000000"
        }"#;

        let details = parse_details(body.as_bytes(), &id()).expect("details decode");
        assert_eq!(details.place_id, id());
        assert_eq!(details.name.as_deref(), Some("Harbour Cafe"));
        assert_eq!(details.position, LatLng::new(50.37, -4.14).ok());
        assert_eq!(details.user_rating_count, Some(212));
        assert_eq!(details.open_now, Some(true));
        assert_eq!(details.weekday_hours.len(), 1);
        assert_eq!(details.types.first().map(String::as_str), Some("cafe"));
    }

    #[test]
    fn sparse_payloads_decode_to_sparse_details() {
        let details = parse_details(br#"{"location": {"latitude": 95.0, "longitude": 0.0}}"#, &id())
            .expect("details decode");
        assert_eq!(details.name, None);
        assert_eq!(details.position, None, "invalid coordinates are dropped");
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        let error = parse_details(b"<html>", &id()).expect_err("not json");
        assert!(matches!(error, PlaceDetailsError::Decode { .. }));
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Unauthorized")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::bad_request(StatusCode::BAD_REQUEST, "Transport")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Transport")]
    fn maps_http_statuses_to_domain_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\": {\"status\": \"X\"}}", &id());
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn not_found_names_the_place() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"", &id());
        assert_eq!(error.to_string(), "place ChIJ-harbour not found");
    }
}
