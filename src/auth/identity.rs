// src/auth/identity.rs
use crate::auth::password::{hash_password, verify_password};
use crate::db::users::{find_user_by_email, touch_last_login, upsert_user};
use crate::db::Database;
use crate::errors::ServerError;

pub const DEFAULT_ROLE: &str = "agent";

/// Who is signed in, plus their role claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl Identity {
    pub fn new(user_id: i64, email: String, role: Option<String>) -> Self {
        let role = role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());
        Self {
            user_id,
            email,
            role,
        }
    }
}

/// Email/password lookup. The listing pipeline never sees this.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str, now: i64) -> Result<Identity, ServerError>;
}

/// Trim + lowercase, minimal sanity check.
pub fn normalize_email(email: &str) -> Result<String, ServerError> {
    let e = email.trim().to_lowercase();
    if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
        return Err(ServerError::BadRequest("invalid email".into()));
    }
    Ok(e)
}

#[derive(Clone)]
pub struct SqliteIdentityProvider {
    db: Database,
}

impl SqliteIdentityProvider {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create the account, or reset its password and role if it exists.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<&str>,
        now: i64,
    ) -> Result<i64, ServerError> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ServerError::BadRequest("password must not be empty".into()));
        }

        let hash = hash_password(password)?;
        self.db
            .with_conn(|conn| upsert_user(conn, &email, &hash, role, now))
    }
}

impl IdentityProvider for SqliteIdentityProvider {
    fn sign_in(&self, email: &str, password: &str, now: i64) -> Result<Identity, ServerError> {
        let rejected = || ServerError::Unauthorized("invalid email or password".into());

        let email = normalize_email(email).map_err(|_| rejected())?;
        let Some(user) = self.db.with_conn(|conn| find_user_by_email(conn, &email))? else {
            return Err(rejected());
        };

        if !verify_password(password, &user.password_hash) {
            return Err(rejected());
        }

        self.db
            .with_conn(|conn| touch_last_login(conn, user.id, now))?;

        Ok(Identity::new(user.id, user.email, user.role))
    }
}
