use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Router};
use dzr_api::{DzrApiClient, DzrApiConfig};
use map_client::{Backend, FetchError};
use model::{
    provider::{Provider, ProviderSelection},
    query::{AreaQuery, NodeQuery, RouteQuery},
    selection::{Goal, Movement, Selection},
    BoundingBox, LatLng,
};

type Params = Query<HashMap<String, String>>;

async fn node_at(Query(params): Params) -> impl IntoResponse {
    match (params.get("lat").map(String::as_str), params.get("long")) {
        // outside the graph
        (Some("0"), Some(_)) => (StatusCode::OK, "\n".to_owned()),
        (Some(_), Some(_)) => (StatusCode::OK, "4711\n".to_owned()),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn route(Query(params): Params) -> impl IntoResponse {
    if params.get("provider").map(String::as_str) == Some("o2") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "graph exploded".to_owned());
    }
    if params.get("t").map(String::as_str) == Some("") {
        return (
            StatusCode::OK,
            r#"{"distance": 0, "travel_time": 0, "route": []}"#.to_owned(),
        );
    }
    let body = r#"{ "distance": 3.25, "travel_time": 0.12,   "route": {"type":"Feature","geometry":{"type":"LineString","coordinates":[[9.1,48.7],[9.2,48.8]]},"properties":null} }"#;
    (StatusCode::OK, body.to_owned())
}

async fn towers(Query(params): Params) -> impl IntoResponse {
    let provider = params.get("provider").cloned().unwrap_or_default();
    format!(
        r#"[{{"radio":"LTE","net":"{provider}","lat":48.75,"lon":9.15,"range":1.5}},{{"radio":"UMTS","net":"{provider}","lat":48.76,"lon":9.2,"range":0.5}}]"#
    )
}

async fn low_coverage() -> &'static str {
    r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"LineString","coordinates":[[9.1,48.7],[9.11,48.71]]},"properties":null}]}"#
}

async fn map_coords() -> &'static str {
    "[ [48.5, 8.9], [48.9, 9.4]]"
}

async fn start_server() -> DzrApiClient {
    let _ = env_logger::builder().is_test(true).try_init();
    let app = Router::new()
        .route("/node_at", get(node_at))
        .route("/route", get(route))
        .route("/towers", get(towers))
        .route("/low_coverage", get(low_coverage))
        .route("/map_coords", get(map_coords));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    DzrApiClient::new(&DzrApiConfig::new(format!("http://{address}"))).unwrap()
}

fn area(provider: Provider) -> AreaQuery {
    AreaQuery {
        bounds: BoundingBox::from_corners(LatLng::new(48.7, 9.1), LatLng::new(48.8, 9.3)),
        provider,
    }
}

#[tokio::test]
async fn node_label_is_trimmed() {
    let client = start_server().await;
    let label = client
        .node_at(NodeQuery {
            position: LatLng::new(48.77, 9.18),
        })
        .await
        .unwrap();
    assert_eq!(label, "4711");
}

#[tokio::test]
async fn empty_node_answer_is_not_found() {
    let client = start_server().await;
    let result = client
        .node_at(NodeQuery {
            position: LatLng::new(0.0, 0.0),
        })
        .await;
    match result {
        Err(FetchError::Status { status, url, body }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/node_at"));
            assert_eq!(body.as_deref(), Some("no node near LatLng(0, 0)"));
        }
        other => panic!("unexpected answer: {other:?}"),
    }
}

#[tokio::test]
async fn route_is_decoded() {
    let client = start_server().await;
    let selection = Selection {
        goal: Goal::Speed,
        movement: Movement::Foot,
        provider: ProviderSelection::Unconstrained,
    };
    let result = client
        .route(RouteQuery::new("1", "2", &selection, None))
        .await
        .unwrap();
    assert_eq!(result.distance, 3.25);
    assert_eq!(result.travel_time, 0.12);
    assert!(result.geometry.is_some());

    let no_path = client
        .route(RouteQuery::new("1", "", &selection, None))
        .await
        .unwrap();
    assert!(no_path.geometry.is_none());
}

#[tokio::test]
async fn server_error_becomes_status_error() {
    let client = start_server().await;
    let query = RouteQuery::new("1", "2", &Selection::default(), Some(Provider::O2));
    match client.route(query).await {
        Err(FetchError::Status { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body.as_deref(), Some("graph exploded"));
        }
        other => panic!("unexpected answer: {other:?}"),
    }
}

#[tokio::test]
async fn towers_and_gaps_are_decoded() {
    let client = start_server().await;
    let towers = client.towers(area(Provider::Vodafone)).await.unwrap();
    assert_eq!(towers.len(), 2);
    assert_eq!(towers[0].radius_m(), 1500.0);

    let gaps = client.coverage_gaps(area(Provider::Telekom)).await.unwrap();
    assert_eq!(gaps.len(), 1);
}

#[tokio::test]
async fn map_bounds_are_decoded() {
    let client = start_server().await;
    let bounds = client.map_bounds().await.unwrap();
    assert_eq!(bounds.south, 48.5);
    assert_eq!(bounds.north, 48.9);
    assert_eq!(bounds.west, 8.9);
    assert_eq!(bounds.east, 9.4);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let client = DzrApiClient::new(&DzrApiConfig::new(format!("http://{address}"))).unwrap();
    let result = client.map_bounds().await;
    assert!(matches!(result, Err(FetchError::Transport(_))));
}
