//! Server-side session store

use crate::auth::models::SessionUser;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A live session: identity snapshot plus a fixed expiry.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session ID, handed to the client as a cookie value
    pub id: String,
    /// Identity snapshot captured at login
    pub user: SessionUser,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Fixed expiry, created_at + TTL. Not refreshed on access.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    fn new(user: SessionUser, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if the session has passed its fixed expiry
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now() >= self.expires_at
    }
}

/// In-process session store keyed by opaque session ID.
///
/// Owns nothing but the snapshot policy: what goes into a session is
/// decided at creation by the caller, expiry is a fixed TTL from
/// creation. `destroy` returns a `Result` so the handler boundary can
/// surface store failures; the in-memory backend itself cannot fail.
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Create a store with the given fixed session lifetime
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Create a session for the given identity snapshot, returning its ID
    pub async fn create(&self, user: SessionUser) -> String {
        let session = Session::new(user, self.ttl);
        let session_id = session.id.clone();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session);
        session_id
    }

    /// Resolve a session by ID. Expired sessions are removed and treated
    /// as absent.
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(session_id) {
            if session.is_expired() {
                sessions.remove(session_id);
                return None;
            }
            return Some(session.clone());
        }
        None
    }

    /// Destroy a session
    pub async fn destroy(&self, session_id: &str) -> Result<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    /// Remove all expired sessions
    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!("swept {} expired sessions", removed);
        }
    }

    /// Number of live (possibly expired but unswept) sessions
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            ttl: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser {
            id: 1,
            name: "Jana".to_string(),
            surname: "Novakova".to_string(),
            role_id: 2,
            city_id: 3,
            age: Some(12),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let session_id = store.create(test_user()).await;

        let session = store.get(&session_id).await;
        assert!(session.is_some());
        assert_eq!(session.unwrap().user.name, "Jana");
    }

    #[tokio::test]
    async fn test_destroy_session() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let session_id = store.create(test_user()).await;

        store.destroy(&session_id).await.unwrap();
        assert!(store.get(&session_id).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_id() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        assert!(store.get("no-such-session").await.is_none());
    }

    #[tokio::test]
    async fn test_session_expires_at_fixed_ttl() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let session_id = store.create(test_user()).await;

        // Backdate the session just past its expiry
        {
            let mut sessions = store.sessions.write().await;
            let session = sessions.get_mut(&session_id).unwrap();
            session.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
        }

        assert!(store.get(&session_id).await.is_none());
        // Expired sessions are removed on access
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_access_does_not_extend_expiry() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let session_id = store.create(test_user()).await;

        let first = store.get(&session_id).await.unwrap();
        let second = store.get(&session_id).await.unwrap();
        assert_eq!(first.expires_at, second.expires_at);
    }

    #[tokio::test]
    async fn test_session_live_just_before_expiry() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let session_id = store.create(test_user()).await;

        {
            let mut sessions = store.sessions.write().await;
            let session = sessions.get_mut(&session_id).unwrap();
            session.expires_at = chrono::Utc::now() + chrono::Duration::seconds(5);
        }

        assert!(store.get(&session_id).await.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = SessionStore::new(chrono::Duration::hours(24));
        let expired_id = store.create(test_user()).await;
        let live_id = store.create(test_user()).await;

        {
            let mut sessions = store.sessions.write().await;
            let session = sessions.get_mut(&expired_id).unwrap();
            session.expires_at = chrono::Utc::now() - chrono::Duration::minutes(1);
        }

        store.cleanup_expired().await;
        assert_eq!(store.count().await, 1);
        assert!(store.get(&live_id).await.is_some());
    }
}
