//! DTOs for the saved-location backend.
//!
//! Rows arrive with loosely named fields. They are normalised here, once,
//! into `LocationRecord`s so nothing past this boundary sees the variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::category::LocationCategory;
use crate::domain::geometry::LatLng;
use crate::domain::location::{Address, LocationRecord, PlaceId, SaveLocationRequest};

/// A JSON scalar that may be text or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum ScalarDto {
    Text(String),
    Number(serde_json::Number),
}

impl ScalarDto {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(text) => text.trim().parse().ok(),
            Self::Number(number) => number.as_f64(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum AddressDto {
    Line(String),
    Parts(Address),
}

/// One backend row, with every accepted spelling of each field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocationRowDto {
    #[serde(default)]
    pub(super) id: Option<ScalarDto>,
    #[serde(default, alias = "place_id")]
    pub(super) place_id: Option<ScalarDto>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default, rename = "type")]
    pub(super) kind: Option<String>,
    #[serde(default)]
    pub(super) category: Option<String>,
    #[serde(default)]
    pub(super) lat: Option<ScalarDto>,
    #[serde(default)]
    pub(super) latitude: Option<ScalarDto>,
    #[serde(default)]
    pub(super) lng: Option<ScalarDto>,
    #[serde(default)]
    pub(super) longitude: Option<ScalarDto>,
    #[serde(default)]
    pub(super) address: Option<AddressDto>,
    #[serde(default)]
    pub(super) entry_point: Option<String>,
    #[serde(default)]
    pub(super) parking_info: Option<String>,
    #[serde(default)]
    pub(super) accessibility_info: Option<String>,
    #[serde(default)]
    pub(super) created_at: Option<String>,
}

impl LocationRowDto {
    pub(super) fn into_domain_record(self) -> Result<LocationRecord, String> {
        let raw_id = self
            .place_id
            .as_ref()
            .or(self.id.as_ref())
            .map(ScalarDto::as_text)
            .ok_or_else(|| "row has no id".to_owned())?;
        let place_id = PlaceId::new(&raw_id).map_err(|error| error.to_string())?;

        let lat = self.lat.as_ref().or(self.latitude.as_ref());
        let lng = self.lng.as_ref().or(self.longitude.as_ref());
        let position = LatLng::from_parts(
            lat.and_then(ScalarDto::as_f64),
            lng.and_then(ScalarDto::as_f64),
        );
        let category = LocationCategory::parse(self.kind.as_deref().or(self.category.as_deref()));
        let address = match self.address {
            Some(AddressDto::Line(line)) => Address {
                formatted: Some(line),
                ..Address::default()
            },
            Some(AddressDto::Parts(parts)) => parts,
            None => Address::default(),
        };

        let mut record = LocationRecord::new(place_id, self.name.unwrap_or_default(), category)
            .with_address(address);
        record.position = position;
        record.entry_point = self.entry_point;
        record.parking = self.parking_info;
        record.accessibility = self.accessibility_info;
        record.created_at = self
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|stamp| stamp.with_timezone(&Utc));
        Ok(record)
    }
}

/// Pull the row array out of any accepted list envelope.
pub(super) fn list_rows(body: Value) -> Result<Vec<Value>, String> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut object) => {
            let rows = object
                .remove("locations")
                .or_else(|| object.remove("data"))
                .ok_or_else(|| "expected an array, `locations` or `data`".to_owned())?;
            match rows {
                Value::Array(rows) => Ok(rows),
                _ => Err("location list is not an array".to_owned()),
            }
        }
        _ => Err("expected a JSON array or object".to_owned()),
    }
}

/// Normalise rows, dropping the ones that cannot become records.
pub(super) fn into_domain_records(rows: Vec<Value>) -> Vec<LocationRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let decoded = serde_json::from_value::<LocationRowDto>(row)
                .map_err(|error| error.to_string())
                .and_then(LocationRowDto::into_domain_record);
            match decoded {
                Ok(record) => Some(record),
                Err(reason) => {
                    warn!(index, reason = %reason, "dropping unusable location row");
                    None
                }
            }
        })
        .collect()
}

/// Unwrap `{ "location": {...} }` when present.
pub(super) fn saved_row(body: Value) -> Value {
    match body {
        Value::Object(mut object) if object.get("location").is_some_and(Value::is_object) => {
            object.remove("location").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Body sent when saving a location.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveLocationBodyDto<'a> {
    pub(super) place_id: &'a str,
    pub(super) name: &'a str,
    pub(super) category: &'a str,
    pub(super) lat: f64,
    pub(super) lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) address: Option<&'a Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) entry_point: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) parking_info: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) accessibility_info: Option<&'a str>,
}

impl<'a> From<&'a SaveLocationRequest> for SaveLocationBodyDto<'a> {
    fn from(request: &'a SaveLocationRequest) -> Self {
        Self {
            place_id: request.place_id.as_str(),
            name: &request.name,
            category: request.category.as_str(),
            lat: request.position.lat(),
            lng: request.position.lng(),
            address: Some(&request.address).filter(|address| **address != Address::default()),
            entry_point: request.entry_point.as_deref(),
            parking_info: request.parking.as_deref(),
            accessibility_info: request.accessibility.as_deref(),
        }
    }
}
