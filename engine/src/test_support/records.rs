//! Builders for records and identifiers used across tests.

use crate::domain::category::LocationCategory;
use crate::domain::geometry::LatLng;
use crate::domain::location::{Address, LocationRecord, PlaceId};
use crate::domain::ports::PlaceDetails;

/// Identifier from a literal.
///
/// # Panics
///
/// Panics when `raw` is blank.
pub fn place_id(raw: &str) -> PlaceId {
    match PlaceId::new(raw) {
        Ok(id) => id,
        Err(error) => panic!("invalid test place id {raw:?}: {error}"),
    }
}

/// Position from a literal pair.
///
/// # Panics
///
/// Panics when the pair is not a valid position.
pub fn position(lat: f64, lng: f64) -> LatLng {
    match LatLng::new(lat, lng) {
        Ok(position) => position,
        Err(error) => panic!("invalid test position ({lat}, {lng}): {error}"),
    }
}

/// Saved record with an optional `(lat, lng)` position.
///
/// # Panics
///
/// Panics when `id` is blank or the position is invalid.
pub fn sample_record(
    id: &str,
    name: &str,
    category: LocationCategory,
    coordinates: Option<(f64, f64)>,
) -> LocationRecord {
    let record = LocationRecord::new(place_id(id), name, category).with_address(Address {
        street: Some(format!("{} Test Street", name.len())),
        city: Some("Plymouth".to_owned()),
        ..Address::default()
    });
    match coordinates {
        Some((lat, lng)) => record.with_position(position(lat, lng)),
        None => record,
    }
}

/// Provider details with a name, address, type hints and position.
///
/// # Panics
///
/// Panics when `id` is blank or the position is invalid.
pub fn details_for(id: &str, name: &str, types: &[&str], lat: f64, lng: f64) -> PlaceDetails {
    PlaceDetails {
        name: Some(name.to_owned()),
        formatted_address: Some(format!("{name}, 1 Harbour Way")),
        types: types.iter().map(|hint| (*hint).to_owned()).collect(),
        position: Some(position(lat, lng)),
        ..PlaceDetails::new(place_id(id))
    }
}
