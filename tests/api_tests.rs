mod common;

use axum::http::StatusCode;
use common::{FakeUpstream, get, json_body, spawn_app};
use std::sync::Arc;

#[tokio::test]
async fn test_location_is_geocoded_once() {
    let upstream = Arc::new(FakeUpstream::seeded());
    let app = spawn_app(upstream.clone()).await;

    let response = get(&app, "/location?data=seattle").await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = json_body(response).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["search_query"], "seattle");
    assert_eq!(first["data"]["formatted_query"], "Seattle, WA, USA");
    assert_eq!(first["data"]["latitude"], 47.6062095);

    let second = json_body(get(&app, "/location?data=seattle").await).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(upstream.calls("geocode"), 1);
}

#[tokio::test]
async fn test_location_is_keyed_by_raw_query_text() {
    let upstream = Arc::new(FakeUpstream::seeded());
    let app = spawn_app(upstream.clone()).await;

    let plain = json_body(get(&app, "/location?data=seattle").await).await;
    let padded = json_body(get(&app, "/location?data=%20seattle").await).await;

    assert_eq!(padded["data"]["search_query"], " seattle");
    assert_ne!(padded["data"]["id"], plain["data"]["id"]);
    assert_eq!(upstream.calls("geocode"), 2);
}

#[tokio::test]
async fn test_location_requires_query() {
    let app = spawn_app(Arc::new(FakeUpstream::seeded())).await;

    let response = get(&app, "/location").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Search query cannot be empty");
}

#[tokio::test]
async fn test_location_without_results_is_not_found() {
    let upstream = Arc::new(FakeUpstream::seeded());
    upstream.set("geocode", serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }));
    let app = spawn_app(upstream).await;

    let response = get(&app, "/location?data=atlantis").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "No location data available");
}

#[tokio::test]
async fn test_weather_miss_then_hit() {
    let upstream = Arc::new(FakeUpstream::seeded());
    let app = spawn_app(upstream.clone()).await;

    let location = json_body(get(&app, "/location?data=seattle").await).await;
    let id = location["data"]["id"].as_i64().unwrap();

    let response = get(&app, &format!("/weather?id={id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-cache"], "MISS");
    let body = json_body(response).await;
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["forecast"], "Foggy in the morning.");
    assert_eq!(records[0]["time"], "Mon Jan 15 2024");
    assert_eq!(records[0]["location_id"], id);

    let response = get(&app, &format!("/weather?id={id}")).await;
    assert_eq!(response.headers()["x-cache"], "HIT");
    let cached = json_body(response).await;
    assert_eq!(cached["data"].as_array().unwrap().len(), 3);
    assert_eq!(cached["data"][2]["forecast"], "Clear throughout the day.");

    assert_eq!(upstream.calls("weather"), 1);
}

#[tokio::test]
async fn test_bracketed_query_parameters() {
    let app = spawn_app(Arc::new(FakeUpstream::seeded())).await;
    get(&app, "/location?data=seattle").await;

    let response = get(
        &app,
        "/trails?data%5Bid%5D=1&data%5Blatitude%5D=47.6&data%5Blongitude%5D=-122.3",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let trail = &body["data"][0];
    assert_eq!(trail["name"], "Rattlesnake Ledge");
    assert_eq!(trail["condition_date"], "2018-07-21");
    assert_eq!(trail["condition_time"], "11:04:51");
}

#[tokio::test]
async fn test_every_resource_route() {
    let app = spawn_app(Arc::new(FakeUpstream::seeded())).await;
    get(&app, "/location?data=seattle").await;

    let expectations = [
        ("/meetups?id=1", "name", "Rust Night"),
        ("/movies?id=1", "title", "Sleepless in Seattle"),
        ("/yelp?id=1", "name", "Pike Place Chowder"),
        ("/trails?id=1", "name", "Rattlesnake Ledge"),
    ];

    for (uri, field, expected) in expectations {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = json_body(response).await;
        assert_eq!(body["data"][0][field], expected, "{uri}");
    }

    let movies = json_body(get(&app, "/movies?id=1").await).await;
    assert_eq!(
        movies["data"][0]["image_url"],
        "https://image.tmdb.org/t/p/w342/sleepless.jpg"
    );
}

#[tokio::test]
async fn test_unknown_location_id() {
    let upstream = Arc::new(FakeUpstream::seeded());
    let app = spawn_app(upstream.clone()).await;

    let response = get(&app, "/weather?id=99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Location 99 not found");
    assert_eq!(upstream.calls("weather"), 0);
}

#[tokio::test]
async fn test_invalid_resource_parameters() {
    let app = spawn_app(Arc::new(FakeUpstream::seeded())).await;

    for uri in [
        "/weather",
        "/weather?id=abc",
        "/weather?id=1&latitude=47.6",
        "/weather?id=1&latitude=95&longitude=0",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json_body(response).await["success"], false, "{uri}");
    }
}

#[tokio::test]
async fn test_empty_upstream_is_not_cached() {
    let upstream = Arc::new(FakeUpstream::seeded());
    upstream.set("trails", serde_json::json!({ "trails": [] }));
    let app = spawn_app(upstream.clone()).await;
    get(&app, "/location?data=seattle").await;

    for _ in 0..2 {
        let response = get(&app, "/trails?id=1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "No trail data available");
    }

    // Nothing was cached, so the provider is asked again every time.
    assert_eq!(upstream.calls("trails"), 2);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let upstream = Arc::new(FakeUpstream::seeded());
    upstream.fail("meetup");
    let app = spawn_app(upstream).await;
    get(&app, "/location?data=seattle").await;

    let response = get(&app, "/meetups?id=1").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Meetup service is unavailable");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = spawn_app(Arc::new(FakeUpstream::seeded())).await;

    let response = get(&app, "/events").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Sorry, that route does not exist");
}
