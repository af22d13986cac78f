// src/db/users.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    /// PHC string, algorithm and salt included.
    pub password_hash: String,
    pub role: Option<String>,
}

/// Insert a user or replace the credentials of an existing one, then return the user id.
/// Email should already be normalized by caller (trim/lowercase).
pub fn upsert_user(
    conn: &Connection,
    email: &str,
    password_hash: &str,
    role: Option<&str>,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into users (email, password_hash, role, created_at)
        values (?, ?, ?, ?)
        on conflict(email) do update set
          password_hash = excluded.password_hash,
          role = excluded.role
        "#,
        params![email, password_hash, role, now],
    )
    .map_err(|e| ServerError::DbError(format!("upsert user failed: {e}")))?;

    conn.query_row(
        "select id from users where email = ?",
        params![email],
        |row| row.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("select user id failed: {e}")))
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>, ServerError> {
    conn.query_row(
        "select id, email, password_hash, role from users where email = ?",
        params![email],
        |r| {
            Ok(UserRow {
                id: r.get(0)?,
                email: r.get(1)?,
                password_hash: r.get(2)?,
                role: r.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

pub fn touch_last_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ? where id = ?",
        params![now, user_id],
    )
    .map_err(|e| ServerError::DbError(format!("update last login failed: {e}")))?;
    Ok(())
}
