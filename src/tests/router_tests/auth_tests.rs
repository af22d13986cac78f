use crate::router::handle;
use crate::tests::utils::{body_string, get, header, post_form, TestApp, TEST_EMAIL, TEST_PASSWORD};

fn login_form(email: &str, password: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .append_pair("password", password)
        .finish()
}

#[test]
fn login_page_loads() {
    let app = TestApp::with_payload("login_page");

    let resp = handle(get("/login", None), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains(r#"name="password""#));
}

#[test]
fn root_redirects_to_dashboard() {
    let app = TestApp::with_payload("root");
    let resp = handle(get("/", None), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/dashboard");
}

#[test]
fn good_credentials_set_session_cookie() {
    let app = TestApp::with_payload("login_ok");

    let form = login_form("Agent@Example.com", TEST_PASSWORD);
    let resp = handle(post_form("/login", &form, None), &app.state).expect("handler failed");

    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/dashboard");

    let set_cookie = header(&resp, "Set-Cookie").to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie = set_cookie.split(';').next().unwrap();
    let resp = handle(get("/dashboard", Some(cookie)), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains(TEST_EMAIL));
    assert!(body.contains("agent"));
}

#[test]
fn bad_credentials_rerender_login_with_401() {
    let app = TestApp::with_payload("login_bad");

    let form = login_form(TEST_EMAIL, "wrong");
    let resp = handle(post_form("/login", &form, None), &app.state).expect("handler failed");

    assert_eq!(resp.status(), 401);
    assert_eq!(header(&resp, "Set-Cookie"), "");
    let body = body_string(resp);
    assert!(body.contains("Invalid email or password."));
    assert!(body.contains(TEST_EMAIL));
}

#[test]
fn unknown_email_is_rejected_the_same_way() {
    let app = TestApp::with_payload("login_unknown");

    let form = login_form("nobody@example.com", TEST_PASSWORD);
    let resp = handle(post_form("/login", &form, None), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 401);
}

#[test]
fn logout_revokes_the_session() {
    let app = TestApp::with_payload("logout");
    let cookie = app.session_cookie();

    let resp = handle(post_form("/logout", "", Some(&cookie)), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    let resp = handle(get("/dashboard", Some(&cookie)), &app.state).expect("handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location"), "/login");
}
