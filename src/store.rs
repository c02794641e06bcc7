//! Shared map from source id to its latest [`FeedSnapshot`].
//!
//! Written by the refresh task, read by the UI task. Each operation takes the
//! lock for a single map access; nothing awaits while holding it.

use crate::feed::FeedSnapshot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Default)]
pub struct FeedStore {
    inner: Arc<Mutex<HashMap<String, Arc<FeedSnapshot>>>>,
    empty: Arc<FeedSnapshot>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<FeedSnapshot>>> {
        // A panicking writer cannot leave a half-inserted entry behind
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the snapshot for `id`.
    pub fn put(&self, id: &str, snapshot: FeedSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.lock().insert(id.to_string(), snapshot);
    }

    /// Latest snapshot for `id`, or an empty one if none has been stored.
    pub fn get(&self, id: &str) -> Arc<FeedSnapshot> {
        self.lock()
            .get(id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl std::fmt::Debug for FeedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedStore").field("len", &self.len()).finish()
    }
}
