//! Conversion of generated example places into engine records.
//!
//! Enabled by the `example-data` feature. The generator crate knows nothing
//! about engine types, so validation happens here.

use example_places::{ExamplePlaceSeed, GenerationError, PlaceSeedDefinition};
use thiserror::Error;
use tracing::debug;

use crate::domain::category::LocationCategory;
use crate::domain::geometry::LatLng;
use crate::domain::location::{Address, LocationRecord, PlaceId, PlaceIdValidationError};

/// Errors raised while producing example records.
#[derive(Debug, Error)]
pub enum ExampleDataError {
    /// The generator rejected the definition.
    #[error("example place generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated identifier was not a valid place id.
    #[error("generated place id is invalid: {0}")]
    PlaceId(#[from] PlaceIdValidationError),
}

impl TryFrom<ExamplePlaceSeed> for LocationRecord {
    type Error = PlaceIdValidationError;

    fn try_from(seed: ExamplePlaceSeed) -> Result<Self, Self::Error> {
        let place_id = PlaceId::new(&seed.place_id)?;
        let position = match (seed.latitude, seed.longitude) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng).ok(),
            _ => None,
        };
        if position.is_none() && seed.has_coordinates() {
            debug!(place_id = %place_id, "dropping out-of-range example coordinates");
        }

        let mut record = Self::new(
            place_id,
            seed.name,
            LocationCategory::parse(Some(&seed.category)),
        )
        .with_address(Address {
            formatted: None,
            street: Some(seed.street),
            city: Some(seed.city),
            postal_code: Some(seed.postal_code),
            country: Some(seed.country),
        });
        record.position = position;
        record.entry_point = seed.entry_point;
        record.parking = seed.parking;
        record.accessibility = seed.accessibility;
        Ok(record)
    }
}

/// Generate and convert the example places described by `definition`.
///
/// # Errors
///
/// Returns [`ExampleDataError::Generation`] when the definition is invalid
/// and [`ExampleDataError::PlaceId`] when a generated id fails validation.
///
/// # Examples
///
/// ```
/// use example_places::PlaceSeedDefinition;
/// use placemarks::example_data::example_records;
///
/// let records = example_records(&PlaceSeedDefinition::new("demo", 7, 4)).expect("records");
/// assert_eq!(records.len(), 4);
/// assert!(records.iter().all(|record| record.has_position()));
/// ```
pub fn example_records(
    definition: &PlaceSeedDefinition,
) -> Result<Vec<LocationRecord>, ExampleDataError> {
    let seeds = example_places::generate_example_places(definition)?;
    seeds
        .into_iter()
        .map(|seed| LocationRecord::try_from(seed).map_err(ExampleDataError::from))
        .collect()
}
