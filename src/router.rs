use crate::auth::sessions::{create_session, revoke_session};
use crate::auth::{
    clear_session_cookie, guard::cookie_value, require_identity, session_cookie, Authenticated,
    IdentityProvider, SESSION_COOKIE,
};
use crate::cache::Clock;
use crate::db::Database;
use crate::domain::{apply_filters, FilterSpec};
use crate::errors::ServerError;
use crate::listings::ListingService;
use crate::responses::{
    html_response, html_response_with_status, json_response, redirect, redirect_with_cookie,
    ResultResp,
};
use crate::spreadsheets::export_records_xlsx;
use crate::templates::pages::{dashboard_page, login_page, DashboardVm, SearchResults};
use astra::Request;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

const MAX_FORM_BYTES: u64 = 16 * 1024;

/// Everything a request handler can reach. Built once in `main`, shared by all workers.
pub struct AppState {
    pub db: Database,
    pub identity: Box<dyn IdentityProvider>,
    pub listings: ListingService,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    fn now_unix(&self) -> i64 {
        self.clock.now().timestamp()
    }
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => redirect("/dashboard"),

        ("GET", "/login") => html_response(login_page("", None)),
        ("POST", "/login") => {
            let form = read_form(&mut req)?;
            sign_in(&form, state)
        }
        ("POST", "/logout") => sign_out(&req, state),

        ("GET", "/dashboard") => {
            let Some(auth) = signed_in(&req, state)? else {
                return redirect("/login");
            };
            dashboard(&req, &auth, state)
        }
        ("GET", "/export") => {
            if signed_in(&req, state)?.is_none() {
                return redirect("/login");
            }
            export(&req, state)
        }

        ("GET", "/search") => {
            let outcome = state.listings.fetch();
            let status = if outcome.failed { "failed" } else { "ok" };
            tracing::debug!(
                records = outcome.records.len(),
                from_snapshot = outcome.from_snapshot,
                status,
                "search served"
            );
            json_response(&outcome.records, &[("X-Fetch-Status", status)])
        }

        _ => Err(ServerError::NotFound),
    }
}

/// The caller's session, or `None` when they need to sign in.
fn signed_in(req: &Request, state: &AppState) -> Result<Option<Authenticated>, ServerError> {
    match require_identity(req, &state.db, state.now_unix()) {
        Ok(auth) => Ok(Some(auth)),
        Err(ServerError::Unauthorized(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn sign_in(form: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let email = form.get("email").map(String::as_str).unwrap_or("");
    let password = form.get("password").map(String::as_str).unwrap_or("");
    let now = state.now_unix();

    match state.identity.sign_in(email, password, now) {
        Ok(identity) => {
            let token = state
                .db
                .with_conn(|conn| create_session(conn, identity.user_id, now))?;
            tracing::info!(user_id = identity.user_id, role = %identity.role, "signed in");
            redirect_with_cookie("/dashboard", &session_cookie(&token))
        }
        Err(ServerError::Unauthorized(_)) => {
            tracing::info!("rejected sign-in attempt");
            html_response_with_status(
                401,
                login_page(email, Some("Invalid email or password.")),
            )
        }
        Err(e) => Err(e),
    }
}

fn sign_out(req: &Request, state: &AppState) -> ResultResp {
    if let Some(token) = cookie_value(req, SESSION_COOKIE) {
        let now = state.now_unix();
        state
            .db
            .with_conn(|conn| revoke_session(conn, &token, now))?;
    }
    redirect_with_cookie("/login", &clear_session_cookie())
}

fn dashboard(req: &Request, auth: &Authenticated, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let spec = FilterSpec::from_params(&params);

    let results = flag(&params, "search").then(|| {
        let outcome = state.listings.fetch();
        SearchResults {
            records: apply_filters(&outcome.records, &spec),
            fetch_failed: outcome.failed,
            export_query: req.uri().query().unwrap_or("").to_string(),
        }
    });

    let vm = DashboardVm {
        auth,
        spec,
        show_map: flag(&params, "map"),
        results,
    };
    html_response(dashboard_page(&vm))
}

fn export(req: &Request, state: &AppState) -> ResultResp {
    let spec = FilterSpec::from_params(&parse_query(req));
    let outcome = state.listings.fetch();
    if outcome.failed {
        tracing::warn!("exporting without upstream data");
    }

    let records = apply_filters(&outcome.records, &spec);
    let filename = format!(
        "apartments_{}.xlsx",
        state.clock.today().format("%Y-%m-%d")
    );
    export_records_xlsx(&records, &filename)
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "on" | "yes"))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Decode an `application/x-www-form-urlencoded` body.
fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("could not read form: {e}")))?;

    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}
