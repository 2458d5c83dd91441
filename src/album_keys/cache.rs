use crate::types::Credential;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Album id to owning API key
///
/// A single mutex guards the map and is only held for the map operation
/// itself; callers do their network I/O before taking it.
#[derive(Default)]
pub struct CredentialCache {
    keys: Mutex<HashMap<String, Credential>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the map half-written, so
    // poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Credential>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, album_id: &str) -> Option<Credential> {
        self.lock().get(album_id).cloned()
    }

    /// Store `credential` for `album_id`; an empty credential removes the entry
    pub fn set(&self, album_id: &str, credential: Credential) {
        tracing::debug!("Setting album key for album {} to {}", album_id, credential);
        let mut keys = self.lock();
        if credential.is_empty() {
            keys.remove(album_id);
        } else {
            keys.insert(album_id.to_string(), credential);
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
