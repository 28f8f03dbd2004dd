//! Clustering across toggles, zoom changes and badge clicks.

use placemarks::domain::ports::{MapSurface, MarkerKind};
use placemarks::domain::{ClusterMode, MarkerClickOutcome, MarkerEngineConfig};
use placemarks::test_support::position;
use rstest::{fixture, rstest};

mod support;

use support::{EngineWorld, neighbourhood};

#[fixture]
fn world() -> EngineWorld {
    let world = EngineWorld::new(Vec::new(), MarkerEngineConfig::default());
    world.engine.update_location_markers(&neighbourhood());
    world
}

fn badge_count(world: &EngineWorld) -> usize {
    world.surface.visible_markers(MarkerKind::ClusterBadge).len()
}

#[rstest]
fn close_places_share_one_badge(world: EngineWorld) {
    let snapshot = world.engine.cluster_snapshot();

    assert_eq!(snapshot.mode, ClusterMode::Clustered);
    assert_eq!(badge_count(&world), 1);
    let cluster = snapshot.clusters.first().expect("one cluster");
    assert_eq!(cluster.count, 3);
    assert_eq!(world.visible_titles(), vec!["Far Hotel".to_owned()]);
}

#[rstest]
fn toggling_twice_restores_the_badges(world: EngineWorld) {
    assert!(!world.engine.toggle_clustering());
    assert_eq!(badge_count(&world), 0);
    assert_eq!(world.visible_titles().len(), 4);
    assert_eq!(world.engine.cluster_snapshot().mode, ClusterMode::Disabled);

    assert!(world.engine.toggle_clustering());
    assert_eq!(badge_count(&world), 1);
    assert_eq!(world.visible_titles().len(), 1);
}

#[rstest]
fn zooming_in_past_the_limit_shows_every_marker(world: EngineWorld) {
    world
        .surface
        .set_view(position(support::CENTRE.0, support::CENTRE.1), 16.0);

    let snapshot = world.engine.on_viewport_changed();

    assert_eq!(snapshot.mode, ClusterMode::SuppressedByZoom);
    assert_eq!(badge_count(&world), 0);
    assert_eq!(world.visible_titles().len(), 4);
}

#[rstest]
fn badge_clicks_zoom_to_the_members(world: EngineWorld) {
    let cluster = world
        .engine
        .cluster_snapshot()
        .clusters
        .first()
        .cloned()
        .expect("one cluster");

    let outcome = world.engine.on_marker_click(cluster.badge);

    assert_eq!(outcome, MarkerClickOutcome::ClusterExpanded(cluster.bounds));
    assert_eq!(world.surface.last_fit(), Some(cluster.bounds));
    assert!(world.surface.current_zoom() > support::START_ZOOM);
    assert!(world.engine.current_session().is_none());
}

#[rstest]
fn updates_never_stack_badges(world: EngineWorld) {
    for _ in 0..3 {
        world.engine.update_location_markers(&neighbourhood());
        world.engine.on_viewport_changed();
    }

    assert_eq!(badge_count(&world), 1);
    assert_eq!(
        world.surface.markers().len(),
        world.engine.marker_count() + 1,
        "only the live badge remains besides location markers"
    );
}
