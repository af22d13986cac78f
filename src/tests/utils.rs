use crate::apify::FetchError;
use crate::auth::sessions::create_session;
use crate::auth::SqliteIdentityProvider;
use crate::cache::{Clock, ManualClock, MemorySnapshotStore, SnapshotCache};
use crate::db::connection::{init_db, Database};
use crate::domain::NeighborhoodOverrides;
use crate::listings::stub::StubSource;
use crate::listings::ListingService;
use crate::router::AppState;
use astra::{Body, Request, Response};
use chrono::{Duration, TimeZone, Utc};
use http::Method;
use std::io::Read;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tempfile::TempDir;

/// Two properties, three units. Camden NoDa has coordinates, Skye does not.
pub const LISTINGS_PAYLOAD: &str = r#"[
  {
    "propertyName": "Camden NoDa",
    "location": {
      "fullAddress": "3130 N Davidson St, Charlotte, NC",
      "neighborhood": "Optimist Park",
      "coordinates": { "latitude": 35.2398, "longitude": -80.8123 }
    },
    "scores": { "walkScore": 78, "transitScore": "41" },
    "url": "https://www.apartments.com/camden-noda/",
    "parkingFees": "[{\"fees\": [{\"key\": \"Garage\", \"value\": \"$50\"}]}]",
    "models": [{
      "modelName": "A1",
      "details": ["1 Bed", "1 Bath", "700 sqft"],
      "units": [
        { "type": "101", "price": "$1,200", "availability": "Now" },
        { "type": "204", "price": "$1,650", "availability": "Mar 20" }
      ]
    }]
  },
  {
    "propertyName": "Skye",
    "location": { "neighborhood": "South End" },
    "models": [{
      "modelName": "B2",
      "details": ["2 Beds", "2 Baths", "1,050 sqft"],
      "units": [{ "type": "1204", "price": "$1,900" }]
    }]
  }
]"#;

pub const TEST_EMAIL: &str = "agent@example.com";
pub const TEST_PASSWORD: &str = "correct horse";

/// Fresh database with the production schema inside its own temporary directory.
/// The directory, and the file with it, goes away when the `TempDir` is dropped.
pub fn init_test_db(tag: &str) -> (TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(format!("apartment_finder_{tag}.sqlite"));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, db)
}

pub struct TestApp {
    pub state: AppState,
    pub upstream_calls: Arc<AtomicUsize>,
    _dir: TempDir,
}

impl TestApp {
    pub fn with_payload(tag: &str) -> Self {
        Self::with_source(tag, StubSource::ok(LISTINGS_PAYLOAD), None)
    }

    pub fn with_upstream_down(tag: &str) -> Self {
        Self::with_source(tag, StubSource::failing(FetchError::Status(503)), None)
    }

    /// Like `with_payload`, with a neighborhood override CSV written to disk and loaded
    /// the way the server loads it.
    pub fn with_neighborhood_csv(tag: &str, csv: &str) -> Self {
        Self::with_source(tag, StubSource::ok(LISTINGS_PAYLOAD), Some(csv))
    }

    fn with_source(tag: &str, source: StubSource, overrides_csv: Option<&str>) -> Self {
        let (dir, db) = init_test_db(tag);
        let clock = Arc::new(ManualClock::at(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ));
        let upstream_calls = source.calls();

        let overrides = match overrides_csv {
            Some(csv) => {
                let path = dir.path().join("neighborhoods.csv");
                std::fs::write(&path, csv).expect("write override csv");
                NeighborhoodOverrides::load(&path)
            }
            None => NeighborhoodOverrides::empty(),
        };

        let cache = SnapshotCache::new(
            Box::new(MemorySnapshotStore::default()),
            clock.clone(),
            Duration::hours(24),
        );
        let listings = ListingService::new(Box::new(source), cache, overrides, clock.clone());

        let identity = SqliteIdentityProvider::new(db.clone());
        identity
            .register(TEST_EMAIL, TEST_PASSWORD, None, clock.now().timestamp())
            .expect("register test user");

        Self {
            state: AppState {
                db,
                identity: Box::new(identity),
                listings,
                clock,
            },
            upstream_calls,
            _dir: dir,
        }
    }

    /// `Cookie` header value for a live session of the test user.
    pub fn session_cookie(&self) -> String {
        let now = self.state.clock.now().timestamp();
        let token = self
            .state
            .db
            .with_conn(|conn| {
                let user_id: i64 = conn
                    .query_row(
                        "select id from users where email = ?",
                        [TEST_EMAIL],
                        |r| r.get(0),
                    )
                    .map_err(|e| crate::errors::ServerError::DbError(e.to_string()))?;
                create_session(conn, user_id, now)
            })
            .expect("create session");
        format!("session={token}")
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    builder.body(Body::from(form.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
