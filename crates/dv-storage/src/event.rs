//! Change notification delivered by [`Storage::watch`](crate::Storage::watch).

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Kind of content change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageEventKind {
    Created,
    Modified,
    Removed,
}

/// A content change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    /// File path relative to the storage root (e.g. `mirascope/calls.mdx`,
    /// `_meta.json`).
    pub path: PathBuf,
    pub kind: StorageEventKind,
}

impl StorageEvent {
    /// Content path of the changed document body, if the file is one.
    ///
    /// `mirascope/calls.mdx` becomes `mirascope/calls`; files that are not
    /// `.md`/`.mdx` bodies (such as `_meta.json`) yield `None`.
    #[must_use]
    pub fn content_path(&self) -> Option<String> {
        let ext = self.path.extension()?.to_str()?;
        if ext != "md" && ext != "mdx" {
            return None;
        }
        let stem = self.path.with_extension("");
        let segments: Option<Vec<&str>> = stem
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        Some(segments?.join("/"))
    }

    /// True if the changed file is named `file_name` (e.g. `_meta.json`).
    #[must_use]
    pub fn is_file_named(&self, file_name: &str) -> bool {
        self.path.file_name() == Some(Path::new(file_name).as_os_str())
    }
}

/// Stream of content changes from a watching backend.
///
/// Every method yields `None` once the backend has stopped sending.
pub struct StorageEventReceiver {
    events: mpsc::Receiver<StorageEvent>,
}

impl StorageEventReceiver {
    pub(crate) fn new(events: mpsc::Receiver<StorageEvent>) -> Self {
        Self { events }
    }

    /// Stream for backends that cannot report changes.
    pub(crate) fn never() -> Self {
        let (sender, events) = mpsc::channel();
        drop(sender);
        Self { events }
    }

    /// Block until the next change.
    #[must_use]
    pub fn wait(&self) -> Option<StorageEvent> {
        self.events.recv().ok()
    }

    #[must_use]
    pub fn wait_for(&self, timeout: Duration) -> Option<StorageEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// A change that is already queued, without blocking.
    #[must_use]
    pub fn poll(&self) -> Option<StorageEvent> {
        self.events.try_recv().ok()
    }

    /// Block for one change, then drain whatever else is queued, so a burst
    /// of saves triggers one rebuild.
    #[must_use]
    pub fn recv_batch(&self) -> Option<Vec<StorageEvent>> {
        let mut batch = vec![self.wait()?];
        while let Some(event) = self.poll() {
            batch.push(event);
        }
        Some(batch)
    }
}

/// Keeps a watcher alive. Dropping it, or calling [`WatchHandle::stop`],
/// ends the watch.
pub struct WatchHandle {
    stop_signal: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    pub(crate) fn new(stop_signal: mpsc::Sender<()>) -> Self {
        Self {
            stop_signal: Some(stop_signal),
        }
    }

    pub(crate) fn detached() -> Self {
        Self { stop_signal: None }
    }

    pub fn stop(mut self) {
        drop(self.stop_signal.take());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn event(path: &str, kind: StorageEventKind) -> StorageEvent {
        StorageEvent {
            path: PathBuf::from(path),
            kind,
        }
    }

    #[test]
    fn test_content_path_strips_extension() {
        let e = event("mirascope/api/llm/call.mdx", StorageEventKind::Modified);
        assert_eq!(e.content_path().as_deref(), Some("mirascope/api/llm/call"));

        let e = event("lilypad/index.md", StorageEventKind::Created);
        assert_eq!(e.content_path().as_deref(), Some("lilypad/index"));
    }

    #[test]
    fn test_content_path_ignores_other_files() {
        assert!(event("_meta.json", StorageEventKind::Modified).content_path().is_none());
        assert!(event("mirascope/logo.png", StorageEventKind::Created).content_path().is_none());
        assert!(event("mirascope/README", StorageEventKind::Created).content_path().is_none());
    }

    #[test]
    fn test_is_file_named() {
        assert!(event("_meta.json", StorageEventKind::Modified).is_file_named("_meta.json"));
        assert!(!event("mirascope/calls.mdx", StorageEventKind::Modified).is_file_named("_meta.json"));
    }

    fn channel() -> (mpsc::Sender<StorageEvent>, StorageEventReceiver) {
        let (sender, events) = mpsc::channel();
        (sender, StorageEventReceiver::new(events))
    }

    #[test]
    fn test_wait_ends_when_sender_is_gone() {
        let (sender, receiver) = channel();
        let change = event("calls.mdx", StorageEventKind::Created);

        sender.send(change.clone()).unwrap();
        assert_eq!(receiver.wait(), Some(change));
        assert!(receiver.poll().is_none());
        assert!(receiver.wait_for(Duration::from_millis(5)).is_none());

        drop(sender);
        assert!(receiver.wait().is_none());
    }

    #[test]
    fn test_recv_batch_drains_queue() {
        let (sender, receiver) = channel();
        let burst = vec![
            event("mirascope/calls.mdx", StorageEventKind::Modified),
            event("mirascope/streams.mdx", StorageEventKind::Created),
            event("_meta.json", StorageEventKind::Modified),
        ];
        for change in &burst {
            sender.send(change.clone()).unwrap();
        }

        assert_eq!(receiver.recv_batch(), Some(burst));

        drop(sender);
        assert!(receiver.recv_batch().is_none());
    }

    #[test]
    fn test_never_yields() {
        let receiver = StorageEventReceiver::never();
        assert!(receiver.wait().is_none());
        assert!(receiver.recv_batch().is_none());
    }

    #[test]
    fn test_stopping_handle_signals_watcher() {
        let (stop, stopped) = mpsc::channel();
        WatchHandle::new(stop).stop();
        assert!(stopped.recv().is_err());

        let (stop, stopped) = mpsc::channel::<()>();
        drop(WatchHandle::new(stop));
        assert!(stopped.recv().is_err());
    }

    static_assertions::assert_impl_all!(StorageEventReceiver: Send);
    static_assertions::assert_impl_all!(WatchHandle: Send);
}
