use std::{env, sync::Arc};

use dzr_api::{DzrApiClient, DzrApiConfig};
use map_client::{MapSession, SessionConfig};
use model::{selection::Selection, BoundingBox, LatLng};

const USAGE: &str =
    "usage: playground <start lat> <start lng> <end lat> <end lng> [goal] [move] [provider]";

fn coordinate(args: &[String], index: usize) -> f64 {
    args.get(index)
        .and_then(|value| value.parse().ok())
        .expect(USAGE)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let start = LatLng::new(coordinate(&args, 0), coordinate(&args, 1));
    let end = LatLng::new(coordinate(&args, 2), coordinate(&args, 3));

    // backend
    let api_config = DzrApiConfig::from_env().expect("expected routing server url in env.");
    let client = DzrApiClient::new(&api_config).expect("could not build http client.");

    // session
    let config = SessionConfig::from_env().expect("invalid session config in env.");
    let session = MapSession::spawn(Arc::new(client), config);

    let defaults = config.initial_selection;
    let selection = Selection::from_form(
        args.get(4).map(String::as_str).unwrap_or(defaults.goal.as_str()),
        args.get(5)
            .map(String::as_str)
            .unwrap_or(defaults.movement.as_str()),
        args.get(6)
            .map(String::as_str)
            .unwrap_or(defaults.provider.as_str()),
    )
    .expect(USAGE);

    session.load_map_bounds().await.unwrap();
    session.set_selection(selection).await.unwrap();
    session.click_start(start).await.unwrap();
    session.click_end(end).await.unwrap();

    let viewport = BoundingBox::from_corners(start, end);
    session.refresh_towers(viewport).await.unwrap();
    session.refresh_coverage_gaps(viewport).await.unwrap();
    session.settled().await.unwrap();

    let view = session.view().await.unwrap();
    log::info!(
        "distance: {}, travel time: {}",
        view.summary.distance,
        view.summary.travel_time
    );
    let json = serde_json::to_string_pretty(&view).unwrap();
    println!("{}", json);
}
