//! Deterministic example saved-place generation for demonstration purposes.
//!
//! This crate produces believable, reproducible saved places around a centre
//! point. It is independent of the engine's domain types: the engine converts
//! [`ExamplePlaceSeed`] values into its own records behind a feature flag.
//!
//! # Example
//!
//! ```
//! use example_places::{PlaceSeedDefinition, generate_example_places};
//!
//! let definition = PlaceSeedDefinition::new("harbour-walk", 42, 5)
//!     .with_center(51.5072, -0.1276)
//!     .with_radius_deg(0.02);
//!
//! let places = generate_example_places(&definition).expect("generation succeeds");
//! assert_eq!(places.len(), 5);
//! ```

mod definition;
mod error;
mod generator;
mod seed;

pub use definition::PlaceSeedDefinition;
pub use error::GenerationError;
pub use generator::{CATEGORY_LABELS, generate_example_places};
pub use seed::ExamplePlaceSeed;
