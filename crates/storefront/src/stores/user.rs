//! Authenticated user state.

use std::sync::Arc;

use atelier_core::UserId;
use tokio::sync::watch;

use crate::backend::UserProfile;

/// Observable "who is logged in".
///
/// `None` means guest. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct UserStore {
    inner: Arc<watch::Sender<Option<UserProfile>>>,
}

impl Default for UserStore {
    fn default() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(tx),
        }
    }
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current user, if any.
    #[must_use]
    pub fn current(&self) -> Option<UserProfile> {
        self.inner.borrow().clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.inner.borrow().as_ref().map(|user| user.id)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Record a login or a refreshed profile.
    ///
    /// Subscribers are only woken when the profile actually changed.
    pub fn set_user(&self, user: UserProfile) {
        self.inner.send_if_modified(|current| {
            if current.as_ref() == Some(&user) {
                false
            } else {
                *current = Some(user);
                true
            }
        });
    }

    /// Forget the user (logout or expired session).
    pub fn clear_user(&self) {
        self.inner.send_if_modified(|current| current.take().is_some());
    }

    /// Receive the new state after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn profile(id: i64) -> UserProfile {
        serde_json::from_value(json!({
            "id": id, "name": "Taro", "email": "taro@example.com"
        }))
        .unwrap()
    }

    #[test]
    fn test_set_and_clear() {
        let store = UserStore::new();
        assert!(!store.is_authenticated());

        store.set_user(profile(1));
        assert_eq!(store.user_id(), Some(UserId::new(1)));

        store.clear_user();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_setting_same_user_does_not_notify() {
        let store = UserStore::new();
        store.set_user(profile(1));
        let rx = store.subscribe();

        store.set_user(profile(1));
        assert!(!rx.has_changed().unwrap());

        store.set_user(profile(2));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_clearing_guest_does_not_notify() {
        let store = UserStore::new();
        let rx = store.subscribe();
        store.clear_user();
        assert!(!rx.has_changed().unwrap());
    }
}
