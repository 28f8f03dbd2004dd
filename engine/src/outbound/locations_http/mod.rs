//! Saved-location backend over HTTP.
//!
//! This module provides a reqwest implementation of the
//! `LocationRepository` port.

mod dto;
mod http_repository;

pub use http_repository::HttpLocationRepository;
