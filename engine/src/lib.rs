//! Marker synchronisation and spatial clustering engine for saved places.
//!
//! The engine keeps map overlays (markers, cluster badges and info overlays)
//! consistent with a collection of saved-location records and mediates every
//! user interaction with them. Map providers, persistence and notification
//! presentation are reached only through the traits in [`domain::ports`].

pub mod config;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::EngineSettings;
pub use domain::{MarkerEngine, MarkerEngineConfig, MarkerEnginePorts};
