use crate::apify::ApifyClient;
use crate::auth::SqliteIdentityProvider;
use crate::cache::{
    Clock, FileSnapshotStore, MemorySnapshotStore, SnapshotCache, SnapshotStore, SystemClock,
};
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::domain::NeighborhoodOverrides;
use crate::listings::ListingService;
use crate::responses::html_error_response;
use crate::router::{handle, AppState};
use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod apify;
mod auth;
mod cache;
mod config;
mod db;
mod domain;
mod errors;
mod listings;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let db = Database::new(config.database_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let identity = SqliteIdentityProvider::new(db.clone());

    if let Some(account) = &config.bootstrap {
        let now = clock.now().timestamp();
        match identity.register(&account.email, &account.password, account.role.as_deref(), now) {
            Ok(user_id) => tracing::info!(user_id, email = %account.email, "bootstrap account ready"),
            Err(e) => tracing::warn!(error = %e, "could not create bootstrap account"),
        }
    }

    let source = match ApifyClient::new(
        config.upstream_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "could not build upstream client");
            std::process::exit(1);
        }
    };

    let store: Box<dyn SnapshotStore> = match &config.snapshot_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "listings snapshot on disk");
            Box::new(FileSnapshotStore::new(path))
        }
        None => {
            tracing::info!("listings snapshot kept in memory");
            Box::new(MemorySnapshotStore::default())
        }
    };
    let cache = SnapshotCache::new(
        store,
        clock.clone(),
        config.snapshot_max_age(),
    );

    let listings = ListingService::new(
        Box::new(source),
        cache,
        NeighborhoodOverrides::load(&config.neighborhood_table),
        clock.clone(),
    );

    let state = AppState {
        db,
        identity: Box::new(identity),
        listings,
        clock,
    };

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, workers = config.max_workers, "starting server");

    let server = Server::bind(&addr).max_workers(config.max_workers);
    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
