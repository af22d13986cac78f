use crate::router::handle;
use crate::tests::utils::{body_string, get, header, TestApp};
use std::sync::atomic::Ordering;

#[test]
fn dashboard_and_export_require_login() {
    let app = TestApp::with_payload("dash_gate");

    for uri in ["/dashboard", "/dashboard?search=1", "/export"] {
        let resp = handle(get(uri, None), &app.state).expect("handler failed");
        assert_eq!(resp.status(), 302, "{uri}");
        assert_eq!(header(&resp, "Location"), "/login");
    }

    let resp = handle(get("/dashboard", Some("session=forged")), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(app.upstream_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn dashboard_without_search_does_not_fetch() {
    let app = TestApp::with_payload("dash_idle");
    let cookie = app.session_cookie();

    let resp = handle(get("/dashboard", Some(&cookie)), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Start searching"));
    assert_eq!(app.upstream_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn search_shows_cheapest_unit_per_matching_property() {
    let app = TestApp::with_payload("dash_search");
    let cookie = app.session_cookie();

    let resp = handle(get("/dashboard?search=1&max_rent=1700", Some(&cookie)), &app.state)
        .expect("handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Camden NoDa"));
    assert!(body.contains("$1,200"));
    assert!(!body.contains("$1,650"));
    assert!(!body.contains("Skye"));
    assert!(body.contains("/export?search=1&amp;max_rent=1700"));
}

#[test]
fn show_all_units_lists_every_unit() {
    let app = TestApp::with_payload("dash_all");
    let cookie = app.session_cookie();

    let resp = handle(
        get("/dashboard?search=1&show_all_units=1", Some(&cookie)),
        &app.state,
    )
    .expect("handler failed");

    let body = body_string(resp);
    assert_eq!(body.matches(r#"class="apartment-card""#).count(), 3);
}

#[test]
fn no_matches_shows_hint() {
    let app = TestApp::with_payload("dash_empty");
    let cookie = app.session_cookie();

    let resp = handle(get("/dashboard?search=1&name=nowhere", Some(&cookie)), &app.state)
        .expect("handler failed");
    assert!(body_string(resp).contains("No apartments found"));
}

#[test]
fn upstream_failure_shows_warning() {
    let app = TestApp::with_upstream_down("dash_down");
    let cookie = app.session_cookie();

    let resp = handle(get("/dashboard?search=1", Some(&cookie)), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Failed to fetch data"));
    assert!(!body.contains("apartment-card\""));
}

#[test]
fn map_view_places_markers() {
    let app = TestApp::with_payload("dash_map");
    let cookie = app.session_cookie();

    let resp = handle(get("/dashboard?search=1&map=1", Some(&cookie)), &app.state)
        .expect("handler failed");
    let body = body_string(resp);
    assert!(body.contains(r#"id="map""#));
    assert!(body.contains("leaflet.js"));
    assert!(body.contains("35.2398"));
}

#[test]
fn export_downloads_filtered_workbook() {
    let app = TestApp::with_payload("dash_export");
    let cookie = app.session_cookie();

    let resp = handle(get("/export?neighborhood=south", Some(&cookie)), &app.state)
        .expect("handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        header(&resp, "Content-Type"),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        header(&resp, "Content-Disposition"),
        "attachment; filename=\"apartments_2025-03-01.xlsx\""
    );

    let mut resp = resp;
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut resp.body_mut().reader(), &mut bytes).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
