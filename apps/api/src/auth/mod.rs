// Accounts: registration, login/logout, password reset, and the
// per-request `CurrentUser` extractor backed by the session store.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod session;
pub mod store;

pub use extractor::CurrentUser;
pub use session::{RedisSessionStore, SessionStore};
