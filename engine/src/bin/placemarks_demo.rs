//! Drive the marker engine over generated example places on a headless map.
//!
//! Every step is reported through `tracing`; set `RUST_LOG=info` (or
//! `debug`) to follow along.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use example_places::PlaceSeedDefinition;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use placemarks::domain::ports::{
    FixtureAuthSession, FixtureLocationRepository, FixtureNavigationLauncher,
    FixturePlaceDetailsSource,
};
use placemarks::domain::{
    ClickOutcome, CoordinateValidationError, LatLng, MapClick, MarkerClickOutcome, OverlayKey,
    PlaceId, PlaceIdValidationError,
};
use placemarks::example_data::{ExampleDataError, example_records};
use placemarks::outbound::{HeadlessMapSurface, TracingNotificationSink};
use placemarks::{EngineSettings, MarkerEngine, MarkerEnginePorts};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const VIEWPORT_WIDTH: u32 = 1024;
const VIEWPORT_HEIGHT: u32 = 768;
const DEMO_POI_ID: &str = "ChIJ-demo-point-of-interest";

/// Errors raised while setting up the demo.
#[derive(Debug, Error)]
enum DemoError {
    /// Engine settings could not be loaded.
    #[error("failed to load engine settings: {0}")]
    Settings(String),
    /// The centre argument is not `lat,lng`.
    #[error("centre must be `lat,lng`, got `{0}`")]
    CentreFormat(String),
    /// The centre is not a valid position.
    #[error("invalid centre: {0}")]
    Centre(#[from] CoordinateValidationError),
    /// Example places could not be produced.
    #[error(transparent)]
    Examples(#[from] ExampleDataError),
    /// The simulated provider place id is invalid.
    #[error(transparent)]
    PlaceId(#[from] PlaceIdValidationError),
}

/// `placemarks-demo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "placemarks-demo",
    about = "Sync, cluster and click generated saved places on a headless map",
    version
)]
struct CliArgs {
    /// Name of the example seed.
    #[arg(long, default_value = "harbour-walk")]
    seed_name: String,
    /// RNG seed for the generated places.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of places to generate.
    #[arg(long, default_value_t = 25)]
    count: usize,
    /// Initial map zoom.
    #[arg(long, default_value_t = 12.0)]
    zoom: f64,
    /// Map centre as `lat,lng`.
    #[arg(long, value_name = "lat,lng", default_value = "51.5072,-0.1276")]
    centre: String,
    /// Percentage of places generated without coordinates.
    #[arg(long, default_value_t = 10)]
    missing_ratio: u8,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build demo runtime")?;
    runtime.block_on(run(args)).wrap_err("demo failed")
}

async fn run(args: CliArgs) -> Result<(), DemoError> {
    // Settings come from the environment and config files only; the demo
    // owns the command line.
    let settings = EngineSettings::load_from_iter([OsString::from("placemarks-demo")])
        .map_err(|error| DemoError::Settings(error.to_string()))?;
    let centre = parse_centre(&args.centre)?;

    let definition = PlaceSeedDefinition::new(args.seed_name.as_str(), args.seed, args.count)
        .with_center(centre.lat(), centre.lng())
        .with_missing_coordinate_ratio(args.missing_ratio);
    let records = example_records(&definition)?;
    info!(seed = definition.name(), records = records.len(), "generated example places");

    let surface = Arc::new(HeadlessMapSurface::new(
        centre,
        args.zoom,
        VIEWPORT_WIDTH,
        VIEWPORT_HEIGHT,
    ));
    let ports = MarkerEnginePorts {
        surface: surface.clone(),
        repository: Arc::new(FixtureLocationRepository),
        place_details: Arc::new(FixturePlaceDetailsSource),
        session: Arc::new(FixtureAuthSession),
        notifications: Arc::new(TracingNotificationSink),
        navigation: Arc::new(FixtureNavigationLauncher),
    };
    let engine = MarkerEngine::new(ports, Arc::new(DefaultClock), settings.engine_config());

    let report = engine.update_location_markers(&records);
    info!(
        placed = report.markers.placed,
        skipped = report.markers.skipped(),
        clusters = report.clusters.clusters.len(),
        mode = report.clusters.mode.as_str(),
        "markers synchronised"
    );

    simulate_marker_click(&engine);
    simulate_poi_click(&engine, centre).await?;

    let enabled = engine.toggle_clustering();
    let snapshot = engine.cluster_snapshot();
    info!(
        enabled,
        clusters = snapshot.clusters.len(),
        individual = snapshot.individual_markers.len(),
        "clustering toggled"
    );

    let closed = engine.on_key(OverlayKey::Escape);
    info!(
        closed,
        overlays_opened = surface.overlays_opened(),
        overlays_closed = surface.overlays_closed(),
        "demo finished"
    );
    Ok(())
}

fn simulate_marker_click(engine: &MarkerEngine) {
    let snapshot = engine.cluster_snapshot();
    let handle = snapshot
        .individual_markers
        .first()
        .copied()
        .or_else(|| snapshot.clusters.first().map(|cluster| cluster.badge));
    let Some(handle) = handle else {
        info!("no markers to click");
        return;
    };
    match engine.on_marker_click(handle) {
        MarkerClickOutcome::Opened(session) => {
            info!(
                place_id = %session.target.place_id(),
                title = %session.content.title,
                "marker overlay opened"
            );
        }
        MarkerClickOutcome::ClusterExpanded(bounds) => {
            info!(?bounds, "cluster badge expanded");
        }
        MarkerClickOutcome::Unknown => warn!(?handle, "clicked marker was not recognised"),
    }
}

async fn simulate_poi_click(engine: &MarkerEngine, at: LatLng) -> Result<(), DemoError> {
    let click = MapClick::on_place(at, PlaceId::new(DEMO_POI_ID)?);
    match engine.on_map_click(click).await {
        ClickOutcome::Opened(session) => info!(
            place_id = %session.target.place_id(),
            title = %session.content.title,
            saved = session.content.saved,
            "provider place overlay opened"
        ),
        other => warn!(outcome = ?other, "provider click did not open an overlay"),
    }
    Ok(())
}

fn parse_centre(raw: &str) -> Result<LatLng, DemoError> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| DemoError::CentreFormat(raw.to_owned()))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| DemoError::CentreFormat(raw.to_owned()))
    };
    Ok(LatLng::new(parse(lat)?, parse(lng)?)?)
}
