//! End-to-end test: serves the seed listings from memory on an ephemeral
//! port and drives the REST API over HTTP.

#![allow(missing_docs)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;

use rental_listings::api;
use rental_listings::app_state::AppState;
use rental_listings::persistence::MemoryListingStore;
use rental_listings::service::ListingService;

async fn spawn_server() -> SocketAddr {
    let seed = concat!(env!("CARGO_MANIFEST_DIR"), "/data/seed_listings.json");
    let Ok(store) = MemoryListingStore::from_seed_file(seed).await else {
        panic!("seed file did not load");
    };
    let app = api::build_app(AppState {
        listing_service: Arc::new(ListingService::new(Arc::new(store))),
        cookie_secure: false,
    });

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("cannot bind an ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn get_json(client: &reqwest::Client, url: &str) -> Value {
    let Ok(response) = client.get(url).send().await else {
        panic!("request failed: {url}");
    };
    assert!(response.status().is_success(), "{url} -> {}", response.status());
    let Ok(body) = response.json::<Value>().await else {
        panic!("response is not json: {url}");
    };
    body
}

#[tokio::test]
async fn search_pages_through_listed_rentals() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let first = get_json(
        &client,
        &format!("http://{addr}/api/v1/listings?pageSize=3&asc=true"),
    )
    .await;
    assert_eq!(first["pagination"]["totalCount"], 4);
    assert_eq!(first["pagination"]["totalPages"], 2);
    assert_eq!(first["listings"][0]["listableUid"], "1002");
    assert_eq!(
        first["listings"][0]["listingUrl"],
        "https://baysiderentals.example.com/listings/detail/1002"
    );

    let next = first["links"]["next"].as_str().unwrap_or_default().to_string();
    let second = get_json(&client, &format!("http://{addr}/api/v1/listings?{next}")).await;
    assert_eq!(second["pagination"]["pageNumber"], 2);
    assert_eq!(second["listings"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["listings"][0]["listableUid"], "1003");
}

#[tokio::test]
async fn filters_and_chips_round_trip() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let body = get_json(
        &client,
        &format!("http://{addr}/api/v1/listings?cities=Arcata&dogs=true&bedrooms=null"),
    )
    .await;
    assert_eq!(body["pagination"]["totalCount"], 1);
    assert_eq!(body["listings"][0]["listableUid"], "1004");
    assert_eq!(body["spec"]["bedrooms"], Value::Null);

    let Some(chips) = body["chips"].as_array() else {
        panic!("chips missing");
    };
    assert_eq!(chips.len(), 2);
    let Some(dogs) = chips.iter().find(|c| c["key"] == "dogs") else {
        panic!("dogs chip missing");
    };
    let remove = dogs["removeQuery"].as_str().unwrap_or_default();
    let widened = get_json(&client, &format!("http://{addr}/api/v1/listings?{remove}")).await;
    assert_eq!(widened["pagination"]["totalCount"], 2);
}

#[tokio::test]
async fn catalog_lookups_skip_unlisted_rows() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let filters = get_json(&client, &format!("http://{addr}/api/v1/listings/filters")).await;
    assert_eq!(
        filters["cities"],
        serde_json::json!(["Arcata", "Eureka", "McKinleyville"])
    );
    assert_eq!(filters["bedrooms"], serde_json::json!([0, 2, 3]));

    let stats = get_json(&client, &format!("http://{addr}/api/v1/stats/bedrooms")).await;
    assert_eq!(stats.as_array().map(Vec::len), Some(3));

    let managements =
        get_json(&client, &format!("http://{addr}/api/v1/property-managements")).await;
    assert_eq!(managements[0]["displayName"], "Bayside Rentals");
}
