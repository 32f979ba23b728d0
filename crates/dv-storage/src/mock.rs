//! In-memory storage for tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, mpsc};

use crate::event::{StorageEvent, StorageEventKind, StorageEventReceiver, WatchHandle};
use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "mock";

/// Mock storage holding document bodies in memory.
///
/// # Example
///
/// ```
/// use dv_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_content("mirascope/calls", "# Calls")
///     .with_failure("mirascope/broken");
///
/// assert_eq!(storage.read("mirascope/calls").unwrap(), "# Calls");
/// assert!(storage.read("mirascope/broken").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    contents: RwLock<HashMap<String, String>>,
    failures: RwLock<Vec<String>>,
    reads: RwLock<Vec<String>>,
    event_sender: RwLock<Option<mpsc::Sender<StorageEvent>>>,
}

impl MockStorage {
    /// Create an empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document body.
    #[must_use]
    pub fn with_content(self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_content(path, body);
        self
    }

    /// Make reads of `path` fail with a permission error.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.into());
        self
    }

    /// Replace or add a document body after construction.
    pub fn set_content(&self, path: impl Into<String>, body: impl Into<String>) {
        self.contents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), body.into());
    }

    /// Content paths read so far, in call order.
    #[must_use]
    pub fn reads(&self) -> Vec<String> {
        self.reads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Send an event to the receiver returned by `watch()`.
    ///
    /// Does nothing if `watch()` has not been called.
    pub fn emit(&self, path: impl Into<PathBuf>, kind: StorageEventKind) {
        let sender = self.event_sender.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            let _ = sender.send(StorageEvent {
                path: path.into(),
                kind,
            });
        }
    }

    /// Close the event channel, ending any watch loop.
    pub fn close_events(&self) {
        self.event_sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn not_found(path: &str) -> StorageError {
        StorageError::missing(BACKEND, path)
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.reads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());

        let failing = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|p| p == path);
        if failing {
            return Err(StorageError::new(
                BACKEND,
                StorageErrorKind::PermissionDenied,
                path,
            ));
        }

        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn exists(&self, path: &str) -> bool {
        self.contents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        let (tx, rx) = mpsc::channel();
        *self
            .event_sender
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(tx);
        Ok((StorageEventReceiver::new(rx), WatchHandle::detached()))
    }
}
