// src/auth/guard.rs
use crate::auth::identity::Identity;
use crate::auth::sessions::{load_identity_from_session, SESSION_TTL_SECS};
use crate::db::Database;
use crate::errors::ServerError;
use astra::Request;

pub const SESSION_COOKIE: &str = "session";

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_TTL_SECS
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Proof that the request carried a live session.
/// Only `require_identity` builds one, so gated handlers take it by reference.
#[derive(Debug, Clone)]
pub struct Authenticated {
    identity: Identity,
}

impl Authenticated {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Read a cookie value by name from the `Cookie` header.
pub fn cookie_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_identity(req: &Request, db: &Database, now: i64) -> Result<Authenticated, ServerError> {
    let token = cookie_value(req, SESSION_COOKIE)
        .ok_or_else(|| ServerError::Unauthorized("sign in required".into()))?;

    let identity = db
        .with_conn(|conn| load_identity_from_session(conn, &token, now))?
        .ok_or_else(|| ServerError::Unauthorized("session expired".into()))?;

    Ok(Authenticated { identity })
}
