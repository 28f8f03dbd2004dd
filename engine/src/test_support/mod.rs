//! Test utilities for the engine crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Compiled
//! for tests and behind the `test-support` feature.

mod clock;
mod collaborators;
mod place_details;
mod records;

pub use clock::MutableClock;
pub use collaborators::{
    InMemoryLocationRepository, RecordingNavigationLauncher, RecordingNotificationSink,
    StaticAuthSession,
};
pub use place_details::ScriptedPlaceDetailsSource;
pub use records::{details_for, place_id, position, sample_record};
