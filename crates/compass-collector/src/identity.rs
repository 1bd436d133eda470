use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use compass_core::ident::generate_id;

const SESSION_KEY: &str = "compass_session_id";
const ANONYMOUS_KEY: &str = "compass_anonymous_id";

/// Key-value storage seam for identifiers.
///
/// The two scopes the collector needs map onto the browser's storage model:
/// a session-scoped store (cleared when the browsing session ends) and a
/// durable store (survives restarts until explicitly cleared). Embedders
/// back these with whatever the host environment offers.
pub trait IdentityStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    /// Drop everything — the analogue of the user clearing storage.
    fn clear(&self);
}

/// In-memory store; doubles as the test double and as the session-scoped
/// store for embedders without real session storage.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Session and anonymous identity, created lazily and reused.
pub struct Identity {
    session: Box<dyn IdentityStore>,
    profile: Box<dyn IdentityStore>,
}

impl Identity {
    /// `session` backs the per-session id; `profile` backs the durable
    /// anonymous id.
    pub fn new(session: Box<dyn IdentityStore>, profile: Box<dyn IdentityStore>) -> Self {
        Self { session, profile }
    }

    /// Stable for the lifetime of the session store's contents; a fresh id
    /// is generated (and persisted) on first access or after the store was
    /// cleared.
    pub fn session_id(&self) -> String {
        get_or_generate(self.session.as_ref(), SESSION_KEY, "session")
    }

    /// Stable across sessions for one profile store.
    pub fn anonymous_id(&self) -> String {
        get_or_generate(self.profile.as_ref(), ANONYMOUS_KEY, "anon")
    }
}

fn get_or_generate(store: &dyn IdentityStore, key: &str, prefix: &str) -> String {
    if let Some(existing) = store.get(key) {
        return existing;
    }
    let id = generate_id(prefix);
    store.set(key, &id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    #[test]
    fn session_id_is_idempotent_within_a_session() {
        let identity = identity();
        assert_eq!(identity.session_id(), identity.session_id());
    }

    #[test]
    fn clearing_session_store_regenerates_session_id() {
        let session = Box::new(MemoryStore::new());
        let identity = Identity::new(session, Box::new(MemoryStore::new()));
        let first = identity.session_id();
        identity.session.clear();
        let second = identity.session_id();
        assert_ne!(first, second, "a cleared session must get a fresh id");
        assert_eq!(second, identity.session_id(), "and the fresh id must then be stable");
    }

    #[test]
    fn anonymous_id_survives_session_clearing() {
        let identity = identity();
        let anon = identity.anonymous_id();
        identity.session.clear();
        assert_eq!(anon, identity.anonymous_id());
    }

    #[test]
    fn ids_carry_their_scope_prefix() {
        let identity = identity();
        assert!(identity.session_id().starts_with("session_"));
        assert!(identity.anonymous_id().starts_with("anon_"));
    }
}
