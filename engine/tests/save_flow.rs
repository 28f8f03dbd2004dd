//! Saving a provider place from its overlay.

use placemarks::domain::ports::{LocationRepositoryError, Notification};
use placemarks::domain::{
    ActionOutcome, ClickOutcome, InteractionTarget, MapClick, MarkerEngineConfig, OverlayAction,
    SaveOutcome,
};
use placemarks::test_support::{details_for, place_id, position};
use rstest::{fixture, rstest};

mod support;

use support::{EngineWorld, neighbourhood};

const POI: &str = "poi-bakery";

#[fixture]
fn world() -> EngineWorld {
    let world = EngineWorld::new(neighbourhood(), MarkerEngineConfig::default());
    world.engine.update_location_markers(&neighbourhood());
    world.details.respond(
        &place_id(POI),
        Ok(details_for(POI, "Corner Bakery", &["bakery"], 51.47, -0.18)),
    );
    world
}

async fn open_poi(world: &EngineWorld) {
    let outcome = world
        .engine
        .on_map_click(MapClick::on_place(position(51.47, -0.18), place_id(POI)))
        .await;
    assert!(matches!(outcome, ClickOutcome::Opened(_)));
}

#[rstest]
#[tokio::test]
async fn saving_draws_a_marker_and_moves_the_overlay_onto_it(world: EngineWorld) {
    open_poi(&world).await;
    let session = world.engine.current_session().expect("overlay open");
    assert!(session.content.actions.contains(&OverlayAction::Save));

    let outcome = world.engine.perform_overlay_action(OverlayAction::Save).await;

    let ActionOutcome::Save(SaveOutcome::Saved(record)) = outcome else {
        panic!("expected a successful save, got {outcome:?}");
    };
    assert_eq!(record.name, "Corner Bakery");
    assert_eq!(world.repository.save_calls(), 1);
    assert!(world.engine.is_saved(&place_id(POI)));
    assert_eq!(world.engine.marker_count(), 5);

    let handle = world.engine.marker_handle(&place_id(POI)).expect("new marker");
    let session = world.engine.current_session().expect("overlay still open");
    assert!(matches!(
        session.target,
        InteractionTarget::SavedLocation { handle: attached, .. } if attached == handle
    ));
    assert!(!session.content.actions.contains(&OverlayAction::Save));
    assert_eq!(
        world.notifications.received(),
        vec![Notification::LocationSaved {
            name: "Corner Bakery".to_owned()
        }]
    );
}

#[rstest]
#[tokio::test]
async fn saving_while_signed_out_prompts_instead(world: EngineWorld) {
    world.session.set(false);
    open_poi(&world).await;

    let outcome = world.engine.perform_overlay_action(OverlayAction::Save).await;

    assert_eq!(outcome, ActionOutcome::Save(SaveOutcome::SignInRequired));
    assert_eq!(world.repository.save_calls(), 0);
    assert_eq!(world.notifications.received(), vec![Notification::SignInRequired]);
    assert!(!world.engine.is_saved(&place_id(POI)));
}

#[rstest]
#[tokio::test]
async fn saving_a_marker_while_signed_out_prompts_instead(world: EngineWorld) {
    world.session.set(false);
    let handle = world.engine.marker_handle(&place_id("far")).expect("far marker");
    world.engine.on_marker_click(handle);

    let outcome = world.engine.perform_overlay_action(OverlayAction::Save).await;

    assert_eq!(outcome, ActionOutcome::Save(SaveOutcome::SignInRequired));
    assert_eq!(world.repository.save_calls(), 0);
    assert_eq!(world.notifications.received(), vec![Notification::SignInRequired]);
    assert!(world.engine.current_session().is_some(), "overlay stays open");
}

#[rstest]
#[tokio::test]
async fn failed_saves_notify_and_keep_the_place_overlay(world: EngineWorld) {
    world
        .repository
        .fail_saves_with(LocationRepositoryError::rejected(500_u16, "database down"));
    open_poi(&world).await;

    let outcome = world.engine.perform_overlay_action(OverlayAction::Save).await;

    assert!(matches!(
        outcome,
        ActionOutcome::Save(SaveOutcome::Failed(LocationRepositoryError::Rejected { status: 500, .. }))
    ));
    assert_eq!(world.engine.marker_count(), 4);
    assert!(matches!(
        world.notifications.received().as_slice(),
        [Notification::SaveFailed { .. }]
    ));
    let session = world.engine.current_session().expect("overlay still open");
    assert!(!session.target.is_saved_location());
}

#[rstest]
#[tokio::test]
async fn saved_markers_offer_no_save_button(world: EngineWorld) {
    let handle = world.engine.marker_handle(&place_id("far")).expect("far marker");
    world.engine.on_marker_click(handle);

    let outcome = world.engine.perform_overlay_action(OverlayAction::Save).await;

    assert_eq!(outcome, ActionOutcome::Save(SaveOutcome::AlreadySaved));
    assert_eq!(world.repository.save_calls(), 0);
}

#[rstest]
#[tokio::test]
async fn directions_open_for_the_selected_place(world: EngineWorld) {
    open_poi(&world).await;

    let outcome = world
        .engine
        .perform_overlay_action(OverlayAction::Directions)
        .await;

    let ActionOutcome::Directions(Some(url)) = outcome else {
        panic!("expected a directions link, got {outcome:?}");
    };
    assert_eq!(world.navigation.opened(), vec![url.clone()]);
    assert!(url.as_str().contains("destination_place_id=poi-bakery"));
}
