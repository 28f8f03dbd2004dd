//! Driven port for the saved-location backend.

use async_trait::async_trait;

use crate::domain::location::{LocationRecord, SaveLocationRequest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by the location backend.
    pub enum LocationRepositoryError {
        /// Network transport failed before a response arrived.
        Transport { message: String } => "location backend transport failed: {message}",
        /// The request took too long.
        Timeout { message: String } => "location backend timed out: {message}",
        /// The session is missing or expired.
        Unauthorized { message: String } => "location backend unauthorised: {message}",
        /// The backend answered with an error status.
        Rejected { status: u16, message: String } =>
            "location backend rejected request ({status}): {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "location backend decode failed: {message}",
    }
}

/// Port for reading and persisting saved locations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Fetch every location saved by the current user.
    async fn get_all_locations(&self) -> Result<Vec<LocationRecord>, LocationRepositoryError>;

    /// Persist a new location and return the stored record.
    async fn save_location(
        &self,
        request: &SaveLocationRequest,
    ) -> Result<LocationRecord, LocationRepositoryError>;
}

/// Fixture repository with no stored locations that echoes saves back.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLocationRepository;

#[async_trait]
impl LocationRepository for FixtureLocationRepository {
    async fn get_all_locations(&self) -> Result<Vec<LocationRecord>, LocationRepositoryError> {
        Ok(Vec::new())
    }

    async fn save_location(
        &self,
        request: &SaveLocationRequest,
    ) -> Result<LocationRecord, LocationRepositoryError> {
        Ok(LocationRecord::from(request.clone()))
    }
}

impl From<SaveLocationRequest> for LocationRecord {
    fn from(request: SaveLocationRequest) -> Self {
        let mut record = Self::new(request.place_id, request.name, request.category)
            .with_position(request.position)
            .with_address(request.address);
        record.entry_point = request.entry_point;
        record.parking = request.parking;
        record.accessibility = request.accessibility;
        record
    }
}
