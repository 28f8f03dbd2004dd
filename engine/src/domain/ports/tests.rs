//! Tests for port fixtures and error helpers.

use super::*;
use crate::domain::category::LocationCategory;
use crate::domain::geometry::LatLng;
use crate::domain::location::{Address, PlaceId, SaveLocationRequest};
use rstest::{fixture, rstest};

#[fixture]
fn save_request() -> SaveLocationRequest {
    let mut request = SaveLocationRequest::new(
        PlaceId::new("ChIJ-quay").expect("valid id"),
        "Quay Bakery",
        LocationCategory::Cafe,
        LatLng::new(50.366, -4.134).expect("valid position"),
    )
    .with_address(Address {
        formatted: Some("2 Quay Road".to_owned()),
        ..Address::default()
    });
    request.entry_point = Some("Rear gate".to_owned());
    request
}

#[rstest]
#[tokio::test]
async fn fixture_repository_echoes_saves(save_request: SaveLocationRequest) {
    let repository = FixtureLocationRepository;
    let record = repository
        .save_location(&save_request)
        .await
        .expect("fixture save succeeds");
    assert_eq!(record.place_id, save_request.place_id);
    assert_eq!(record.position, Some(save_request.position));
    assert_eq!(record.address.formatted.as_deref(), Some("2 Quay Road"));
    assert_eq!(record.entry_point.as_deref(), Some("Rear gate"));
    assert!(record.created_at.is_none());
    assert!(
        repository
            .get_all_locations()
            .await
            .expect("fixture list")
            .is_empty()
    );
}

#[tokio::test]
async fn fixture_details_source_reports_not_found() {
    let id = PlaceId::new("ChIJ-missing").expect("valid id");
    let err = FixturePlaceDetailsSource
        .lookup_place_details(&id, &PlaceDetailField::OVERLAY)
        .await
        .expect_err("fixture never finds places");
    assert_eq!(err, PlaceDetailsError::not_found("ChIJ-missing"));
    assert_eq!(err.kind(), "NotFound");
}

#[test]
fn fixture_surface_issues_distinct_handles() {
    use crate::domain::icons::IconImage;
    use crate::domain::geometry::ScreenPoint;

    let surface = FixtureMapSurface::default();
    let placement = MarkerPlacement {
        position: LatLng::new(0.0, 0.0).expect("valid position"),
        title: "origin".to_owned(),
        icon: IconImage {
            markup: "<svg/>".to_owned(),
            data_uri: "data:image/svg+xml;base64,PHN2Zy8+".to_owned(),
            width: 32,
            height: 32,
            anchor: ScreenPoint { x: 16.0, y: 16.0 },
        },
        kind: MarkerKind::Location,
        z_index: 0,
    };
    let first = surface.place_overlay_marker(&placement).expect("placed");
    let second = surface.place_overlay_marker(&placement).expect("placed");
    assert_ne!(first, second);
    assert!(surface.project_to_screen(placement.position).is_none());
}

#[rstest]
#[case(PlaceDetailField::DisplayName, "displayName")]
#[case(PlaceDetailField::OpeningHours, "regularOpeningHours")]
#[case(PlaceDetailField::PhoneNumber, "nationalPhoneNumber")]
fn detail_fields_map_to_mask_names(#[case] field: PlaceDetailField, #[case] expected: &str) {
    assert_eq!(field.mask_name(), expected);
}

#[test]
fn rejected_errors_carry_status() {
    let err = LocationRepositoryError::rejected(422_u16, "duplicate place");
    assert_eq!(
        err.to_string(),
        "location backend rejected request (422): duplicate place"
    );
}

#[test]
fn notifications_render_toast_text() {
    let saved = Notification::LocationSaved {
        name: "Quay Bakery".to_owned(),
    };
    assert_eq!(saved.message(), "Saved Quay Bakery");
    assert_eq!(Notification::SignInRequired.kind(), "sign_in_required");
}
