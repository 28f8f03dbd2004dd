//! Provider place-detail lookups over HTTP.
//!
//! This module provides a reqwest implementation of the
//! `PlaceDetailsSource` port against a Places-style details endpoint.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_PLACES_BASE, HttpPlaceDetailsSource};
