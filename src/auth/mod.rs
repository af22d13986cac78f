pub mod guard;
pub mod identity;
pub mod password;
pub mod sessions;
pub mod token;

pub use guard::{clear_session_cookie, require_identity, session_cookie, Authenticated, SESSION_COOKIE};
pub use identity::{Identity, IdentityProvider, SqliteIdentityProvider};
