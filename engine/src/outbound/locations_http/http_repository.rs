//! Reqwest-backed saved-location repository.
//!
//! This adapter owns transport details only: endpoint layout, bearer
//! authentication, status mapping and decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use super::dto::{
    LocationRowDto, SaveLocationBodyDto, into_domain_records, list_rows, saved_row,
};
use crate::domain::location::{LocationRecord, SaveLocationRequest};
use crate::domain::ports::{LocationRepository, LocationRepositoryError};
use crate::outbound::http_body::body_preview;

/// Location repository talking to `{base}/locations`.
pub struct HttpLocationRepository {
    client: Client,
    endpoint: Url,
    bearer_token: Option<String>,
}

impl HttpLocationRepository {
    /// Build a repository using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: locations_endpoint(base),
            bearer_token: None,
        })
    }

    /// Send `token` as a bearer credential on every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Resolved collection endpoint.
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, LocationRepositoryError> {
        let response = self
            .authorised(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl LocationRepository for HttpLocationRepository {
    async fn get_all_locations(&self) -> Result<Vec<LocationRecord>, LocationRepositoryError> {
        let body = self.send(self.client.get(self.endpoint.clone())).await?;
        parse_locations(&body)
    }

    async fn save_location(
        &self,
        request: &SaveLocationRequest,
    ) -> Result<LocationRecord, LocationRepositoryError> {
        let payload = SaveLocationBodyDto::from(request);
        let body = self
            .send(self.client.post(self.endpoint.clone()).json(&payload))
            .await?;
        parse_saved(&body, request)
    }
}

fn locations_endpoint(base: &Url) -> Url {
    let mut endpoint = base.clone();
    if let Ok(mut segments) = endpoint.path_segments_mut() {
        segments.pop_if_empty().push("locations");
    }
    endpoint
}

fn parse_locations(body: &[u8]) -> Result<Vec<LocationRecord>, LocationRepositoryError> {
    let decoded: Value = serde_json::from_slice(body).map_err(|error| {
        LocationRepositoryError::decode(format!("invalid location list payload: {error}"))
    })?;
    let rows = list_rows(decoded).map_err(LocationRepositoryError::decode)?;
    Ok(into_domain_records(rows))
}

/// Decode the stored record. An empty body echoes the request back.
fn parse_saved(
    body: &[u8],
    request: &SaveLocationRequest,
) -> Result<LocationRecord, LocationRepositoryError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LocationRecord::from(request.clone()));
    }
    let decoded: Value = serde_json::from_slice(body).map_err(|error| {
        LocationRepositoryError::decode(format!("invalid saved location payload: {error}"))
    })?;
    let mut row: LocationRowDto = serde_json::from_value(saved_row(decoded)).map_err(|error| {
        LocationRepositoryError::decode(format!("invalid saved location row: {error}"))
    })?;
    if row.place_id.is_none() && row.id.is_none() {
        return Ok(LocationRecord::from(request.clone()));
    }
    if row.name.is_none() {
        row.name = Some(request.name.clone());
    }
    let mut record = row
        .into_domain_record()
        .map_err(LocationRepositoryError::decode)?;
    if record.position.is_none() {
        record.position = Some(request.position);
    }
    Ok(record)
}

fn map_transport_error(error: reqwest::Error) -> LocationRepositoryError {
    if error.is_timeout() {
        LocationRepositoryError::timeout(error.to_string())
    } else {
        LocationRepositoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LocationRepositoryError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        body_preview
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LocationRepositoryError::unauthorized(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            LocationRepositoryError::timeout(message)
        }
        _ => LocationRepositoryError::rejected(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for non-network repository helpers.

    use super::*;
    use crate::domain::category::LocationCategory;
    use crate::domain::geometry::LatLng;
    use crate::domain::location::{Address, PlaceId};
    use rstest::rstest;

    fn request() -> SaveLocationRequest {
        SaveLocationRequest::new(
            PlaceId::new("poi-1").expect("valid id"),
            "Tide Museum",
            LocationCategory::Museum,
            LatLng::new(50.37, -4.14).expect("valid position"),
        )
        .with_address(Address {
            formatted: Some("1 Quay Road".to_owned()),
            ..Address::default()
        })
    }

    #[rstest]
    #[case::bare_host("https://api.example.test", "https://api.example.test/locations")]
    #[case::trailing_slash("https://api.example.test/v1/", "https://api.example.test/v1/locations")]
    #[case::no_trailing_slash("https://api.example.test/v1", "https://api.example.test/v1/locations")]
    fn endpoint_appends_the_collection(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        assert_eq!(locations_endpoint(&base).as_str(), expected);
    }

    #[rstest]
    #[case::bare(r#"[{"id": "a", "name": "Alpha"}]"#)]
    #[case::locations(r#"{"locations": [{"id": "a", "name": "Alpha"}]}"#)]
    #[case::data(r#"{"data": [{"id": "a", "name": "Alpha"}]}"#)]
    fn accepts_every_list_envelope(#[case] body: &str) {
        let records = parse_locations(body.as_bytes()).expect("list decodes");
        let names: Vec<_> = records.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha"]);
    }

    #[test]
    fn normalises_field_spellings() {
        let body = r#"[
            {
                "placeId": "p-1",
                "name": "Harbour Cafe",
                "type": "cafe",
                "lat": "50.37",
                "lng": -4.14,
                "address": "1 Quay Road",
                "entryPoint": "Side door",
                "parkingInfo": "Street",
                "accessibilityInfo": "Step-free",
                "createdAt": "2024-05-01T10:00:00Z"
            },
            {
                "id": 42,
                "name": "Old Fort",
                "category": "museum",
                "latitude": 50.36,
                "longitude": "-4.13",
                "address": { "street": "Fort Lane", "city": "Plymouth" }
            },
            { "name": "No identifier" },
            "not even an object"
        ]"#;

        let records = parse_locations(body.as_bytes()).expect("list decodes");
        assert_eq!(records.len(), 2, "rows without ids are dropped");

        let cafe = records.first().expect("first row");
        assert_eq!(cafe.place_id.as_str(), "p-1");
        assert_eq!(cafe.category, LocationCategory::Cafe);
        assert_eq!(cafe.position, LatLng::new(50.37, -4.14).ok());
        assert_eq!(cafe.address.display_line().as_deref(), Some("1 Quay Road"));
        assert_eq!(cafe.entry_point.as_deref(), Some("Side door"));
        assert_eq!(cafe.parking.as_deref(), Some("Street"));
        assert_eq!(cafe.accessibility.as_deref(), Some("Step-free"));
        assert!(cafe.created_at.is_some());

        let fort = records.get(1).expect("second row");
        assert_eq!(fort.place_id.as_str(), "42");
        assert_eq!(fort.category, LocationCategory::Museum);
        assert_eq!(fort.position, LatLng::new(50.36, -4.13).ok());
        assert_eq!(fort.address.city.as_deref(), Some("Plymouth"));
    }

    #[test]
    fn invalid_coordinates_become_missing() {
        let body = r#"[{"id": "x", "name": "Nowhere", "lat": "north", "lng": 200}]"#;
        let records = parse_locations(body.as_bytes()).expect("list decodes");
        assert_eq!(records.first().map(|record| record.position), Some(None));
    }

    #[test]
    fn rejects_payloads_that_are_not_lists() {
        let error = parse_locations(br#"{"items": []}"#).expect_err("unknown envelope");
        assert!(matches!(error, LocationRepositoryError::Decode { .. }));
    }

    #[rstest]
    #[case::bare(r#"{"id": "poi-1", "name": "Tide Museum", "type": "museum", "lat": 50.37, "lng": -4.14}"#)]
    #[case::wrapped(r#"{"location": {"placeId": "poi-1", "type": "museum"}}"#)]
    #[case::empty("")]
    fn saved_records_decode_from_every_shape(#[case] body: &str) {
        let record = parse_saved(body.as_bytes(), &request()).expect("saved decodes");
        assert_eq!(record.place_id.as_str(), "poi-1");
        assert_eq!(record.name, "Tide Museum");
        assert_eq!(record.category, LocationCategory::Museum);
        assert_eq!(record.position, LatLng::new(50.37, -4.14).ok());
    }

    #[test]
    fn save_body_is_flat_camel_case() {
        let request = request();
        let body = serde_json::to_value(SaveLocationBodyDto::from(&request)).expect("serialise");
        assert_eq!(body["placeId"], "poi-1");
        assert_eq!(body["category"], "museum");
        assert_eq!(body["lat"], 50.37);
        assert_eq!(body["address"]["formatted"], "1 Quay Road");
        assert!(body.get("entryPoint").is_none());
    }

    #[test]
    fn save_body_carries_structured_metadata() {
        let mut request = request().with_address(Address {
            street: Some("Fort Lane".to_owned()),
            city: Some("Plymouth".to_owned()),
            ..Address::default()
        });
        request.entry_point = Some("Side door".to_owned());
        request.parking = Some("Street".to_owned());
        request.accessibility = Some("Step-free".to_owned());

        let body = serde_json::to_value(SaveLocationBodyDto::from(&request)).expect("serialise");

        assert_eq!(body["address"]["street"], "Fort Lane");
        assert_eq!(body["address"]["city"], "Plymouth");
        assert_eq!(body["entryPoint"], "Side door");
        assert_eq!(body["parkingInfo"], "Street");
        assert_eq!(body["accessibilityInfo"], "Step-free");
        assert!(body.get("createdAt").is_none());

        // The body reads back through the list decoder unchanged.
        let listed = format!("[{body}]");
        let record = parse_locations(listed.as_bytes())
            .expect("list decodes")
            .into_iter()
            .next()
            .expect("one row");
        assert_eq!(record.address, request.address);
        assert_eq!(record.entry_point, request.entry_point);
        assert_eq!(record.parking, request.parking);
        assert_eq!(record.accessibility, request.accessibility);
    }

    #[test]
    fn empty_addresses_are_omitted_from_the_save_body() {
        let request = request().with_address(Address::default());
        let body = serde_json::to_value(SaveLocationBodyDto::from(&request)).expect("serialise");
        assert!(body.get("address").is_none());
    }

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Unauthorized")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Rejected")]
    fn maps_http_statuses_to_domain_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, b"{\"error\": \"nope\"}");
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn rejected_errors_keep_the_status_and_body() {
        let error = map_status_error(StatusCode::CONFLICT, b"  duplicate\n place ");
        assert_eq!(
            error,
            LocationRepositoryError::rejected(409_u16, "duplicate place")
        );
    }
}
