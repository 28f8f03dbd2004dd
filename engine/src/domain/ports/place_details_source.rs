//! Driven port for provider place-detail lookups.
//!
//! Lookups may be slow or fail; callers bound them with a timeout and fall
//! back to a minimal place when they do.

use async_trait::async_trait;

use crate::domain::geometry::LatLng;
use crate::domain::location::PlaceId;

use super::define_port_error;

/// Detail fields a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceDetailField {
    /// Provider identifier.
    Id,
    /// Display name.
    DisplayName,
    /// Single-line address.
    FormattedAddress,
    /// Provider place-type hints.
    Types,
    /// Coordinates.
    Location,
    /// Average rating.
    Rating,
    /// Number of ratings.
    UserRatingCount,
    /// Opening state and weekly hours.
    OpeningHours,
    /// Website address.
    Website,
    /// Phone number.
    PhoneNumber,
}

impl PlaceDetailField {
    /// Fields requested for an overlay.
    pub const OVERLAY: [Self; 10] = [
        Self::Id,
        Self::DisplayName,
        Self::FormattedAddress,
        Self::Types,
        Self::Location,
        Self::Rating,
        Self::UserRatingCount,
        Self::OpeningHours,
        Self::Website,
        Self::PhoneNumber,
    ];

    /// Provider field-mask name.
    pub const fn mask_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::DisplayName => "displayName",
            Self::FormattedAddress => "formattedAddress",
            Self::Types => "types",
            Self::Location => "location",
            Self::Rating => "rating",
            Self::UserRatingCount => "userRatingCount",
            Self::OpeningHours => "regularOpeningHours",
            Self::Website => "websiteUri",
            Self::PhoneNumber => "nationalPhoneNumber",
        }
    }
}

/// Extended details for one provider place.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetails {
    /// Identifier the lookup was made for.
    pub place_id: PlaceId,
    /// Display name.
    pub name: Option<String>,
    /// Single-line address.
    pub formatted_address: Option<String>,
    /// Provider place-type hints, most specific first.
    pub types: Vec<String>,
    /// Coordinates.
    pub position: Option<LatLng>,
    /// Average rating, usually 1.0 to 5.0.
    pub rating: Option<f64>,
    /// Number of ratings behind `rating`.
    pub user_rating_count: Option<u32>,
    /// Whether the place is open right now.
    pub open_now: Option<bool>,
    /// One line per weekday.
    pub weekday_hours: Vec<String>,
    /// Website address.
    pub website: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
}

impl PlaceDetails {
    /// Details carrying only the identifier.
    pub const fn new(place_id: PlaceId) -> Self {
        Self {
            place_id,
            name: None,
            formatted_address: None,
            types: Vec::new(),
            position: None,
            rating: None,
            user_rating_count: None,
            open_now: None,
            weekday_hours: Vec::new(),
            website: None,
            phone_number: None,
        }
    }
}

define_port_error! {
    /// Errors raised by place-detail lookups.
    pub enum PlaceDetailsError {
        /// The provider does not know the place.
        NotFound { place_id: String } => "place {place_id} not found",
        /// Network transport failed before a response arrived.
        Transport { message: String } => "place details transport failed: {message}",
        /// The lookup took too long.
        Timeout { message: String } => "place details lookup timed out: {message}",
        /// The response could not be decoded.
        Decode { message: String } => "place details decode failed: {message}",
        /// The provider rejected the credentials.
        Unauthorized { message: String } => "place details unauthorised: {message}",
    }
}

/// Port for looking up provider place details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceDetailsSource: Send + Sync {
    /// Fetch `fields` for `place_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::PlaceId;
    /// use placemarks::domain::ports::{
    ///     FixturePlaceDetailsSource, PlaceDetailField, PlaceDetailsSource,
    /// };
    ///
    /// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
    /// let id = PlaceId::new("ChIJ-fixture").expect("valid id");
    /// let result = FixturePlaceDetailsSource
    ///     .lookup_place_details(&id, &PlaceDetailField::OVERLAY)
    ///     .await;
    /// assert!(result.is_err());
    /// # });
    /// ```
    async fn lookup_place_details(
        &self,
        place_id: &PlaceId,
        fields: &[PlaceDetailField],
    ) -> Result<PlaceDetails, PlaceDetailsError>;
}

/// Fixture source that knows no places; every lookup fails with
/// `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePlaceDetailsSource;

#[async_trait]
impl PlaceDetailsSource for FixturePlaceDetailsSource {
    async fn lookup_place_details(
        &self,
        place_id: &PlaceId,
        _fields: &[PlaceDetailField],
    ) -> Result<PlaceDetails, PlaceDetailsError> {
        Err(PlaceDetailsError::not_found(place_id.as_str()))
    }
}
