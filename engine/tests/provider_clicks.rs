//! Provider place clicks through the engine: deduplication, fallbacks and
//! stale lookups.

use std::time::Duration;

use placemarks::domain::interaction::FALLBACK_PLACE_NAME;
use placemarks::domain::ports::PlaceDetailsError;
use placemarks::domain::{ClickOutcome, MapClick, MarkerEngineConfig, OverlayKey};
use placemarks::test_support::{ScriptedPlaceDetailsSource, details_for, place_id, position};
use rstest::{fixture, rstest};
use tokio::sync::mpsc;

mod support;

use support::{EngineWorld, neighbourhood};

fn click(id: &str) -> MapClick {
    MapClick::on_place(position(51.49, -0.13), place_id(id))
}

fn script(world: &EngineWorld, id: &str, name: &str) {
    world.details.respond(
        &place_id(id),
        Ok(details_for(id, name, &["museum"], 51.49, -0.13)),
    );
}

#[fixture]
fn world() -> EngineWorld {
    let world = EngineWorld::new(Vec::new(), MarkerEngineConfig::default());
    world.engine.update_location_markers(&neighbourhood());
    world
}

#[rstest]
#[tokio::test]
async fn rapid_repeat_clicks_open_one_overlay(world: EngineWorld) {
    script(&world, "poi-1", "Tide Museum");
    script(&world, "poi-1", "Tide Museum");

    let first = world.engine.on_map_click(click("poi-1")).await;
    world.clock.advance_millis(200);
    let second = world.engine.on_map_click(click("poi-1")).await;

    assert!(matches!(first, ClickOutcome::Opened(_)));
    assert_eq!(second, ClickOutcome::Duplicate);
    assert!(second.suppresses_provider_overlay());
    assert_eq!(world.details.calls(), vec![place_id("poi-1")]);
    assert_eq!(world.surface.overlays_opened(), 1);

    world.clock.advance_millis(600);
    let third = world.engine.on_map_click(click("poi-1")).await;
    assert!(matches!(third, ClickOutcome::Opened(_)));
    assert_eq!(world.details.calls().len(), 2);
}

#[rstest]
#[tokio::test]
async fn failed_lookups_still_open_a_fallback_overlay(world: EngineWorld) {
    world.details.respond(
        &place_id("poi-x"),
        Err(PlaceDetailsError::transport("connection reset")),
    );

    let outcome = world.engine.on_map_click(click("poi-x")).await;

    let ClickOutcome::Opened(session) = outcome else {
        panic!("expected a fallback overlay, got {outcome:?}");
    };
    assert_eq!(session.content.title, FALLBACK_PLACE_NAME);
    assert_eq!(session.target.position(), Some(position(51.49, -0.13)));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_lookups_time_out_to_the_fallback() {
    let config = MarkerEngineConfig {
        details_timeout: Duration::from_millis(250),
        ..MarkerEngineConfig::default()
    };
    let world = EngineWorld::new(Vec::new(), config);
    script(&world, "poi-slow", "Never Shown");
    let _gate = world.details.gate(&place_id("poi-slow"));

    let outcome = world.engine.on_map_click(click("poi-slow")).await;

    let ClickOutcome::Opened(session) = outcome else {
        panic!("expected a fallback overlay, got {outcome:?}");
    };
    assert_eq!(session.content.title, FALLBACK_PLACE_NAME);
}

#[tokio::test]
async fn superseded_lookups_never_render() {
    let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
    let world = EngineWorld::with_details(
        Vec::new(),
        MarkerEngineConfig::default(),
        ScriptedPlaceDetailsSource::with_entered(entered_tx),
    );
    world.engine.update_location_markers(&neighbourhood());
    script(&world, "slow", "Slow Gallery");
    script(&world, "fast", "Fast Cafe");
    let gate = world.details.gate(&place_id("slow"));

    let (slow, fast) = tokio::join!(world.engine.on_map_click(click("slow")), async {
        assert_eq!(entered_rx.recv().await, Some(place_id("slow")));
        let far = world.engine.marker_handle(&place_id("far")).expect("far marker");
        world.engine.on_marker_click(far);
        let fast = world.engine.on_map_click(click("fast")).await;
        gate.notify_one();
        fast
    });

    assert_eq!(slow, ClickOutcome::Stale);
    assert!(matches!(fast, ClickOutcome::Opened(_)));
    let open = world.surface.open_overlay().expect("an overlay is open");
    assert_eq!(open.content.title, "Fast Cafe");
}

#[rstest]
#[tokio::test]
async fn escape_and_empty_clicks_close_overlays(world: EngineWorld) {
    script(&world, "poi-1", "Tide Museum");
    world.engine.on_map_click(click("poi-1")).await;
    assert!(world.engine.on_key(OverlayKey::Escape));
    assert!(!world.engine.on_key(OverlayKey::Escape));

    let far = world.engine.marker_handle(&place_id("far")).expect("far marker");
    world.engine.on_marker_click(far);
    let outcome = world
        .engine
        .on_map_click(MapClick::empty(position(51.48, -0.14)))
        .await;

    assert_eq!(outcome, ClickOutcome::EmptyArea { closed_overlay: true });
    assert!(world.surface.open_overlay().is_none());
}
