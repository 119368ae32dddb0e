//! Session and password-reset tokens.
//!
//! Tokens are opaque random UUIDs. The store maps them to a user id with a TTL;
//! nothing about the user is kept in process memory between requests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use uuid::Uuid;

/// Reset tokens are short-lived and single-use.
pub const RESET_TOKEN_TTL_SECS: u64 = 15 * 60;

const SESSION_PREFIX: &str = "carvia:session:";
const RESET_PREFIX: &str = "carvia:reset:";
/// Per-user set of live session tokens, used to revoke them all at once.
const USER_SESSIONS_PREFIX: &str = "carvia:user-sessions:";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session and returns its bearer token.
    async fn create_session(&self, user_id: Uuid) -> Result<String>;

    /// User behind a live session token.
    async fn session_user(&self, token: &str) -> Result<Option<Uuid>>;

    async fn destroy_session(&self, token: &str) -> Result<()>;

    /// Ends every session of `user_id`. Returns how many tokens were dropped.
    async fn revoke_user_sessions(&self, user_id: Uuid) -> Result<usize>;

    /// Issues a password-reset token valid for `RESET_TOKEN_TTL_SECS`.
    async fn create_reset_token(&self, user_id: Uuid) -> Result<String>;

    /// Returns the user for a reset token and invalidates it in the same step.
    async fn consume_reset_token(&self, token: &str) -> Result<Option<Uuid>>;
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn parse_user_id(raw: Option<String>) -> Result<Option<Uuid>> {
    raw.map(|s| Uuid::parse_str(&s))
        .transpose()
        .context("Session store holds a malformed user id")
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    session_ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(client: &redis::Client, session_ttl_secs: u64) -> Result<Self> {
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;
        Ok(RedisSessionStore {
            conn,
            session_ttl_secs,
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create_session(&self, user_id: Uuid) -> Result<String> {
        let token = new_token();
        let index = format!("{USER_SESSIONS_PREFIX}{user_id}");
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .set_ex(
                format!("{SESSION_PREFIX}{token}"),
                user_id.to_string(),
                self.session_ttl_secs,
            )
            .ignore()
            .sadd(&index, &token)
            .ignore()
            .expire(&index, self.session_ttl_secs as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(token)
    }

    async fn session_user(&self, token: &str) -> Result<Option<Uuid>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(format!("{SESSION_PREFIX}{token}")).await?;
        parse_user_id(raw)
    }

    async fn destroy_session(&self, token: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(format!("{SESSION_PREFIX}{token}")).await?;
        Ok(())
    }

    async fn revoke_user_sessions(&self, user_id: Uuid) -> Result<usize> {
        let index = format!("{USER_SESSIONS_PREFIX}{user_id}");
        let mut conn = self.conn.clone();
        let tokens: Vec<String> = conn.smembers(&index).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for token in &tokens {
            pipe.del(format!("{SESSION_PREFIX}{token}")).ignore();
        }
        pipe.del(&index).ignore();
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(tokens.len())
    }

    async fn create_reset_token(&self, user_id: Uuid) -> Result<String> {
        let token = new_token();
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            format!("{RESET_PREFIX}{token}"),
            user_id.to_string(),
            RESET_TOKEN_TTL_SECS,
        )
        .await?;
        Ok(token)
    }

    async fn consume_reset_token(&self, token: &str) -> Result<Option<Uuid>> {
        let key = format!("{RESET_PREFIX}{token}");
        let mut conn = self.conn.clone();
        let (raw,): (Option<String>,) = redis::pipe()
            .atomic()
            .get(&key)
            .del(&key)
            .ignore()
            .query_async(&mut conn)
            .await?;
        parse_user_id(raw)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store for tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Same contract as `RedisSessionStore`, without expiry.
    #[derive(Default)]
    pub struct MemorySessionStore {
        sessions: Mutex<HashMap<String, Uuid>>,
        resets: Mutex<HashMap<String, Uuid>>,
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn create_session(&self, user_id: Uuid) -> Result<String> {
            let token = new_token();
            self.sessions.lock().unwrap().insert(token.clone(), user_id);
            Ok(token)
        }

        async fn session_user(&self, token: &str) -> Result<Option<Uuid>> {
            Ok(self.sessions.lock().unwrap().get(token).copied())
        }

        async fn destroy_session(&self, token: &str) -> Result<()> {
            self.sessions.lock().unwrap().remove(token);
            Ok(())
        }

        async fn revoke_user_sessions(&self, user_id: Uuid) -> Result<usize> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, owner| *owner != user_id);
            Ok(before - sessions.len())
        }

        async fn create_reset_token(&self, user_id: Uuid) -> Result<String> {
            let token = new_token();
            self.resets.lock().unwrap().insert(token.clone(), user_id);
            Ok(token)
        }

        async fn consume_reset_token(&self, token: &str) -> Result<Option<Uuid>> {
            Ok(self.resets.lock().unwrap().remove(token))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::memory::MemorySessionStore;
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsed() {
        assert_eq!(bearer_token(&headers_with("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers_with("bearer   abc123 ")), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("abc123")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_tokens_are_unique_hex() {
        let a = new_token();
        let b = new_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(Some(id.to_string())).unwrap(), Some(id));
        assert_eq!(parse_user_id(None).unwrap(), None);
        assert!(parse_user_id(Some("garbage".to_string())).is_err());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = MemorySessionStore::default();
        let user = Uuid::new_v4();
        let token = store.create_session(user).await.unwrap();
        assert_eq!(store.session_user(&token).await.unwrap(), Some(user));
        store.destroy_session(&token).await.unwrap();
        assert_eq!(store.session_user(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let store = MemorySessionStore::default();
        let user = Uuid::new_v4();
        let token = store.create_reset_token(user).await.unwrap();
        assert_eq!(store.consume_reset_token(&token).await.unwrap(), Some(user));
        assert_eq!(store.consume_reset_token(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke_user_sessions_leaves_other_users() {
        let store = MemorySessionStore::default();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let laptop = store.create_session(user).await.unwrap();
        let phone = store.create_session(user).await.unwrap();
        let theirs = store.create_session(other).await.unwrap();

        assert_eq!(store.revoke_user_sessions(user).await.unwrap(), 2);
        assert_eq!(store.session_user(&laptop).await.unwrap(), None);
        assert_eq!(store.session_user(&phone).await.unwrap(), None);
        assert_eq!(store.session_user(&theirs).await.unwrap(), Some(other));
    }
}
