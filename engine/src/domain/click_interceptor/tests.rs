//! Tests for click deduplication, lookup fallbacks and stale discards.

use super::*;
use crate::domain::category::LocationCategory;
use crate::domain::interaction::{
    FALLBACK_ADDRESS, FALLBACK_PLACE_NAME, MediatorConfig, MediatorPorts,
};
use crate::domain::marker_registry::SavedPlaceIndex;
use crate::domain::ports::{
    FixtureAuthSession, FixtureLocationRepository, FixtureNavigationLauncher,
    FixtureNotificationSink, PlaceDetailsError,
};
use crate::outbound::HeadlessMapSurface;
use crate::test_support::{MutableClock, ScriptedPlaceDetailsSource, details_for, place_id, position};
use rstest::{fixture, rstest};
use tokio::sync::mpsc;

struct Harness {
    clock: Arc<MutableClock>,
    details: Arc<ScriptedPlaceDetailsSource>,
    surface: Arc<HeadlessMapSurface>,
    mediator: Arc<InteractionMediator>,
    interceptor: Arc<ProviderClickInterceptor>,
}

impl Harness {
    fn with_source(details: ScriptedPlaceDetailsSource) -> Self {
        let clock = Arc::new(MutableClock::fixed());
        let details = Arc::new(details);
        let surface = Arc::new(HeadlessMapSurface::new(position(51.5, -0.12), 15.0, 800, 600));
        let mediator = Arc::new(InteractionMediator::new(
            MediatorPorts {
                surface: surface.clone(),
                repository: Arc::new(FixtureLocationRepository),
                session: Arc::new(FixtureAuthSession),
                notifications: Arc::new(FixtureNotificationSink),
                navigation: Arc::new(FixtureNavigationLauncher),
            },
            SavedPlaceIndex::default(),
            MediatorConfig::default(),
        ));
        let interceptor = Arc::new(ProviderClickInterceptor::new(
            clock.clone(),
            details.clone(),
            mediator.clone(),
            ClickInterceptorConfig::default(),
        ));
        Self {
            clock,
            details,
            surface,
            mediator,
            interceptor,
        }
    }

    fn script(&self, id: &str, name: &str) {
        self.details.respond(
            &place_id(id),
            Ok(details_for(id, name, &["museum"], 51.503, -0.119)),
        );
    }
}

fn click(id: &str) -> MapClick {
    MapClick::on_place(position(51.5, -0.12), place_id(id))
}

#[fixture]
fn harness() -> Harness {
    Harness::with_source(ScriptedPlaceDetailsSource::default())
}

#[rstest]
#[tokio::test]
async fn empty_area_clicks_close_the_overlay(harness: Harness) {
    harness.script("poi-1", "Maritime Museum");
    harness.interceptor.handle_click(click("poi-1")).await;

    let outcome = harness
        .interceptor
        .handle_click(MapClick::empty(position(51.49, -0.13)))
        .await;

    assert_eq!(outcome, ClickOutcome::EmptyArea { closed_overlay: true });
    assert!(!outcome.suppresses_provider_overlay());
    assert!(harness.surface.open_overlay().is_none());
}

#[rstest]
#[tokio::test]
async fn place_clicks_open_a_looked_up_overlay(harness: Harness) {
    harness.script("poi-1", "Maritime Museum");

    let outcome = harness.interceptor.handle_click(click("poi-1")).await;

    assert!(outcome.suppresses_provider_overlay());
    let ClickOutcome::Opened(session) = outcome else {
        panic!("expected an overlay, got {outcome:?}");
    };
    assert_eq!(session.content.title, "Maritime Museum");
    assert_eq!(session.content.category, LocationCategory::Museum);
    assert_eq!(session.target.position(), Some(position(51.503, -0.119)));
}

#[rstest]
#[tokio::test]
async fn repeated_clicks_inside_the_window_are_ignored(harness: Harness) {
    harness.script("poi-1", "Maritime Museum");
    harness.script("poi-1", "Maritime Museum");
    harness.interceptor.handle_click(click("poi-1")).await;

    harness.clock.advance_millis(200);
    let repeat = harness.interceptor.handle_click(click("poi-1")).await;
    assert_eq!(repeat, ClickOutcome::Duplicate);
    assert!(repeat.suppresses_provider_overlay());

    // The ignored click does not extend the window.
    harness.clock.advance_millis(350);
    let later = harness.interceptor.handle_click(click("poi-1")).await;
    assert!(matches!(later, ClickOutcome::Opened(_)));
    assert_eq!(harness.details.calls().len(), 2);
}

#[rstest]
#[tokio::test]
async fn other_places_are_not_deduplicated(harness: Harness) {
    harness.script("poi-1", "Maritime Museum");
    harness.script("poi-2", "Science Museum");
    harness.interceptor.handle_click(click("poi-1")).await;

    harness.clock.advance_millis(50);
    let outcome = harness.interceptor.handle_click(click("poi-2")).await;

    assert!(matches!(outcome, ClickOutcome::Opened(_)));
    assert_eq!(harness.surface.overlays_opened(), 2);
}

#[rstest]
#[case::not_found(PlaceDetailsError::not_found("poi-1"))]
#[case::transport(PlaceDetailsError::transport("connection reset"))]
#[case::unauthorized(PlaceDetailsError::unauthorized("key revoked"))]
#[tokio::test]
async fn lookup_failures_fall_back_to_a_minimal_place(
    harness: Harness,
    #[case] error: PlaceDetailsError,
) {
    harness.details.respond(&place_id("poi-1"), Err(error));

    let outcome = harness.interceptor.handle_click(click("poi-1")).await;

    let ClickOutcome::Opened(session) = outcome else {
        panic!("expected a fallback overlay, got {outcome:?}");
    };
    assert_eq!(session.content.title, FALLBACK_PLACE_NAME);
    assert_eq!(session.content.address.as_deref(), Some(FALLBACK_ADDRESS));
    assert_eq!(session.content.category, LocationCategory::Unknown);
    assert_eq!(session.target.position(), Some(position(51.5, -0.12)));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_lookups_time_out_to_the_fallback(harness: Harness) {
    let _gate = harness.details.gate(&place_id("poi-1"));

    let outcome = harness.interceptor.handle_click(click("poi-1")).await;

    let ClickOutcome::Opened(session) = outcome else {
        panic!("expected a fallback overlay, got {outcome:?}");
    };
    assert_eq!(session.content.title, FALLBACK_PLACE_NAME);
}

#[tokio::test]
async fn late_lookups_are_discarded_when_superseded() {
    let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
    let harness = Harness::with_source(ScriptedPlaceDetailsSource::with_entered(entered_tx));
    harness.script("slow", "Slow Gallery");
    harness.script("fast", "Fast Cafe");
    let gate = harness.details.gate(&place_id("slow"));

    let interceptor = harness.interceptor.clone();
    let pending = tokio::spawn(async move { interceptor.handle_click(click("slow")).await });
    assert_eq!(entered_rx.recv().await, Some(place_id("slow")));

    let fast = harness.interceptor.handle_click(click("fast")).await;
    assert!(matches!(fast, ClickOutcome::Opened(_)));

    gate.notify_one();
    let slow = pending.await.expect("click task joins");
    assert_eq!(slow, ClickOutcome::Stale);
    let open = harness.surface.open_overlay().expect("fast overlay stays open");
    assert_eq!(open.content.title, "Fast Cafe");
    assert_eq!(harness.surface.overlays_opened(), 1);
}

#[tokio::test]
async fn closing_while_a_lookup_is_pending_discards_it() {
    let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
    let harness = Harness::with_source(ScriptedPlaceDetailsSource::with_entered(entered_tx));
    harness.script("slow", "Slow Gallery");
    let gate = harness.details.gate(&place_id("slow"));

    let interceptor = harness.interceptor.clone();
    let pending = tokio::spawn(async move { interceptor.handle_click(click("slow")).await });
    assert_eq!(entered_rx.recv().await, Some(place_id("slow")));

    assert!(!harness.mediator.close(CloseReason::Escape));
    gate.notify_one();

    assert_eq!(pending.await.expect("click task joins"), ClickOutcome::Stale);
    assert!(harness.mediator.current().is_none());
}
