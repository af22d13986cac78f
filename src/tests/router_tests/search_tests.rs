use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, TestApp};
use serde_json::Value;
use std::sync::atomic::Ordering;

#[test]
fn search_returns_every_unit_with_table_headers() {
    let app = TestApp::with_payload("search_ok");

    let resp = handle(get("/search", None), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "application/json");
    assert_eq!(header(&resp, "X-Fetch-Status"), "ok");

    let rows: Vec<Value> = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(first["Property Name"], "Camden NoDa");
    assert_eq!(first["Unit Number"], "101");
    assert_eq!(first["Availability Date"], "2025-03-01");
    assert_eq!(first["Parking Fees"], "Garage: $50");
    assert_eq!(first["Walk Score"], "78");
    assert_eq!(first["Latitude"], 35.2398);

    let skye = &rows[2];
    assert_eq!(skye["Pet Fees"], "Not specified");
    assert!(skye["Latitude"].is_null());
}

#[test]
fn search_applies_neighborhood_overrides_from_csv() {
    let app = TestApp::with_neighborhood_csv(
        "search_overrides",
        "Property Name,Corrected Neighborhood\nSkye,Wilmore\n",
    );

    let resp = handle(get("/search", None), &app.state).expect("handler failed");
    let rows: Vec<Value> = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(rows.len(), 3);

    let skye = rows
        .iter()
        .find(|r| r["Property Name"] == "Skye")
        .expect("Skye row");
    assert_eq!(skye["Neighborhood"], "Wilmore");
    // properties without an entry keep the upstream value
    assert_eq!(rows[0]["Neighborhood"], "Optimist Park");
}

#[test]
fn second_search_is_served_from_snapshot() {
    let app = TestApp::with_payload("search_snapshot");

    handle(get("/search", None), &app.state).expect("first search");
    handle(get("/search", None), &app.state).expect("second search");

    assert_eq!(app.upstream_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn search_with_upstream_down_is_empty_and_flagged() {
    let app = TestApp::with_upstream_down("search_down");

    let resp = handle(get("/search", None), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "X-Fetch-Status"), "failed");
    assert_eq!(body_string(resp), "[]");
}

#[test]
fn unknown_route_is_not_found() {
    let app = TestApp::with_payload("not_found");
    let result = handle(get("/nope", None), &app.state);
    assert!(matches!(result, Err(ServerError::NotFound)));
}
