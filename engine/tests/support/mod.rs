//! Shared wiring for engine integration tests.
//!
//! Each test file compiles as its own crate, so not every helper is used
//! everywhere.
#![expect(dead_code, reason = "helpers are shared across test crates")]

use std::sync::Arc;

use placemarks::domain::ports::MarkerKind;
use placemarks::domain::{LocationCategory, LocationRecord, MarkerEngineConfig};
use placemarks::outbound::HeadlessMapSurface;
use placemarks::test_support::{
    InMemoryLocationRepository, MutableClock, RecordingNavigationLauncher,
    RecordingNotificationSink, ScriptedPlaceDetailsSource, StaticAuthSession, position,
    sample_record,
};
use placemarks::{MarkerEngine, MarkerEnginePorts};

/// Map centre every world starts at.
pub const CENTRE: (f64, f64) = (51.5, -0.12);
/// Starting zoom; below the default clustering cut-off.
pub const START_ZOOM: f64 = 12.0;

/// An engine plus handles on every collaborator it drives.
pub struct EngineWorld {
    pub surface: Arc<HeadlessMapSurface>,
    pub repository: Arc<InMemoryLocationRepository>,
    pub details: Arc<ScriptedPlaceDetailsSource>,
    pub session: Arc<StaticAuthSession>,
    pub notifications: Arc<RecordingNotificationSink>,
    pub navigation: Arc<RecordingNavigationLauncher>,
    pub clock: Arc<MutableClock>,
    pub engine: MarkerEngine,
}

impl EngineWorld {
    /// World whose backend already stores `records`.
    pub fn new(records: Vec<LocationRecord>, config: MarkerEngineConfig) -> Self {
        Self::with_details(records, config, ScriptedPlaceDetailsSource::default())
    }

    /// World using a prepared detail source.
    pub fn with_details(
        records: Vec<LocationRecord>,
        config: MarkerEngineConfig,
        details: ScriptedPlaceDetailsSource,
    ) -> Self {
        let surface = Arc::new(HeadlessMapSurface::new(
            position(CENTRE.0, CENTRE.1),
            START_ZOOM,
            800,
            600,
        ));
        let repository = Arc::new(InMemoryLocationRepository::with_records(records));
        let details = Arc::new(details);
        let session = Arc::new(StaticAuthSession::signed_in());
        let notifications = Arc::new(RecordingNotificationSink::default());
        let navigation = Arc::new(RecordingNavigationLauncher::default());
        let clock = Arc::new(MutableClock::fixed());
        let engine = MarkerEngine::new(
            MarkerEnginePorts {
                surface: surface.clone(),
                repository: repository.clone(),
                place_details: details.clone(),
                session: session.clone(),
                notifications: notifications.clone(),
                navigation: navigation.clone(),
            },
            clock.clone(),
            config,
        );
        Self {
            surface,
            repository,
            details,
            session,
            notifications,
            navigation,
            clock,
            engine,
        }
    }

    /// Titles of the location markers currently shown, sorted.
    pub fn visible_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .surface
            .visible_markers(MarkerKind::Location)
            .into_iter()
            .map(|marker| marker.placement.title)
            .collect();
        titles.sort();
        titles
    }
}

/// Three places a few metres apart, one far away and one without
/// coordinates.
pub fn neighbourhood() -> Vec<LocationRecord> {
    vec![
        sample_record("a", "Alpha", LocationCategory::Cafe, Some((51.5000, -0.1200))),
        sample_record("b", "Bravo", LocationCategory::Bar, Some((51.5005, -0.1195))),
        sample_record("c", "Charlie", LocationCategory::Park, Some((51.5003, -0.1205))),
        sample_record("far", "Far Hotel", LocationCategory::Hotel, Some((51.52, -0.05))),
        sample_record("nowhere", "Unplaced", LocationCategory::Shop, None),
    ]
}
