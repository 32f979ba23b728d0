//! Per-file debouncing of raw watcher events.
//!
//! Editors often emit several events for one save (truncate, write, rename).
//! Events for the same file are merged until the file has been quiet for the
//! debounce window, then released as one event.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::event::StorageEventKind;

struct Pending {
    kind: StorageEventKind,
    deadline: Instant,
}

/// Thread-safe event debouncer keyed by absolute file path.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    window: Duration,
}

impl EventDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Pending>> {
        // The map stays consistent even if a holder panicked
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a raw event, merging it with any pending event for the file.
    pub(crate) fn record(&self, path: PathBuf, kind: StorageEventKind) {
        let deadline = Instant::now() + self.window;
        let mut pending = self.lock();

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(Pending { kind, deadline });
            }
            Entry::Occupied(mut entry) => match merge(entry.get().kind, kind) {
                Some(merged) => {
                    let event = entry.get_mut();
                    event.kind = merged;
                    event.deadline = deadline;
                }
                None => {
                    entry.remove();
                }
            },
        }
    }

    /// Release events whose window has elapsed, ordered by path.
    pub(crate) fn drain_ready(&self) -> Vec<(PathBuf, StorageEventKind)> {
        let now = Instant::now();
        let mut ready: Vec<(PathBuf, StorageEventKind)> = self
            .lock()
            .extract_if(|_, event| event.deadline <= now)
            .map(|(path, event)| (path, event.kind))
            .collect();
        ready.sort_by(|a, b| a.0.cmp(&b.0));
        ready
    }
}

/// Merge a new event into a pending one. `None` drops both.
#[allow(clippy::match_same_arms)]
fn merge(pending: StorageEventKind, new: StorageEventKind) -> Option<StorageEventKind> {
    use crate::event::StorageEventKind::{Created, Modified, Removed};

    match (pending, new) {
        (Created, Created | Modified) => Some(Created),
        // Never seen by consumers
        (Created, Removed) => None,
        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        (Modified | Removed, Removed) => Some(Removed),
        // Replaced in place
        (Removed, Created) => Some(Modified),
        (Removed, Modified) => Some(Removed),
    }
}
