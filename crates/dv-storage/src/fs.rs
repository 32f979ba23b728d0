//! Filesystem storage.
//!
//! [`FsStorage`] maps a content path to `<root>/<path>.mdx`, falling back to
//! `<root>/<path>.md`.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use glob::Pattern;
use notify::{RecursiveMode, Watcher};

use crate::debouncer::EventDebouncer;
use crate::event::{StorageEvent, StorageEventKind, StorageEventReceiver, WatchHandle};
use crate::storage::{Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "fs";

/// Body extensions, in resolution order.
const EXTENSIONS: [&str; 2] = ["mdx", "md"];

const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// Files that trigger change events unless configured otherwise.
pub const DEFAULT_WATCH_PATTERNS: &[&str] = &["**/*.mdx", "**/*.md", "**/_meta.json"];

/// Filesystem storage rooted at a content directory (usually `content/docs`).
pub struct FsStorage {
    root: PathBuf,
    watch_patterns: Vec<Pattern>,
}

impl FsStorage {
    /// Create a storage watching [`DEFAULT_WATCH_PATTERNS`].
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let watch_patterns = DEFAULT_WATCH_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();
        Self {
            root,
            watch_patterns,
        }
    }

    /// Create a storage with custom watch patterns (relative to `root`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if a pattern is not a valid glob.
    pub fn with_patterns(root: PathBuf, patterns: &[String]) -> Result<Self, StorageError> {
        let watch_patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    StorageError::new(BACKEND, StorageErrorKind::InvalidPath, p).caused_by(e)
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            root,
            watch_patterns,
        })
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject empty paths and anything that could leave the root
    /// (`..`, absolute paths, `.` segments).
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let valid = !path.is_empty()
            && Path::new(path)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if valid {
            Ok(())
        } else {
            Err(StorageError::new(BACKEND, StorageErrorKind::InvalidPath, path))
        }
    }

    /// Resolve a content path to the first existing body file.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{path}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| StorageError::missing(BACKEND, path))
    }

    fn matches_patterns(patterns: &[Pattern], rel_path: &Path) -> bool {
        patterns.is_empty() || patterns.iter().any(|p| p.matches_path(rel_path))
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        let file = self.resolve(path)?;
        tracing::trace!(path, file = %file.display(), "Reading document body");
        fs::read_to_string(&file).map_err(|e| StorageError::from_io(BACKEND, file, e))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        let (event_tx, event_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let debouncer = Arc::new(EventDebouncer::new(DEBOUNCE_WINDOW));

        let root = self.root.clone();
        let patterns = self.watch_patterns.clone();
        let recorder = Arc::clone(&debouncer);

        let unavailable = |e: notify::Error| {
            StorageError::new(BACKEND, StorageErrorKind::Unavailable, &self.root).caused_by(e)
        };

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(error = %e, "File watcher error");
                        return;
                    }
                };
                let kind = match event.kind {
                    notify::EventKind::Create(_) => StorageEventKind::Created,
                    notify::EventKind::Modify(_) => StorageEventKind::Modified,
                    notify::EventKind::Remove(_) => StorageEventKind::Removed,
                    _ => return,
                };
                for path in event.paths {
                    let matched = path
                        .strip_prefix(&root)
                        .is_ok_and(|rel| Self::matches_patterns(&patterns, rel));
                    if matched {
                        recorder.record(path, kind);
                    }
                }
            })
            .map_err(unavailable)?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(unavailable)?;
        tracing::info!(root = %self.root.display(), "Watching content for changes");

        let root = self.root.clone();
        std::thread::spawn(move || {
            // Dropping the watcher stops notifications
            let _watcher = watcher;

            loop {
                match shutdown_rx.recv_timeout(DRAIN_INTERVAL) {
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }

                for (path, kind) in debouncer.drain_ready() {
                    let Ok(rel) = path.strip_prefix(&root) else {
                        continue;
                    };
                    let event = StorageEvent {
                        path: rel.to_path_buf(),
                        kind,
                    };
                    tracing::debug!(path = %event.path.display(), kind = ?event.kind, "Content changed");
                    if event_tx.send(event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((StorageEventReceiver::new(event_rx), WatchHandle::new(shutdown_tx)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_read_mdx() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mirascope/calls.mdx", "# Calls");
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.read("mirascope/calls").unwrap(), "# Calls");
    }

    #[test]
    fn test_read_falls_back_to_md() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mirascope/api/index.md", "API");
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.read("mirascope/api/index").unwrap(), "API");
    }

    #[test]
    fn test_read_prefers_mdx() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lilypad/intro.md", "md");
        write(dir.path(), "lilypad/intro.mdx", "mdx");
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert_eq!(storage.read("lilypad/intro").unwrap(), "mdx");
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        let err = storage.read("mirascope/nope").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.backend(), "fs");
        assert_eq!(err.path(), Path::new("mirascope/nope"));
    }

    #[test]
    fn test_directory_is_not_a_body() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("mirascope/api.mdx")).unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert!(!storage.exists("mirascope/api"));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        for path in ["../secret", "mirascope/../../etc/passwd", "/etc/passwd", "./calls", ""] {
            let err = storage.read(path).unwrap_err();
            assert_eq!(err.kind(), StorageErrorKind::InvalidPath, "{path}");
            assert!(!storage.exists(path));
        }
    }

    #[test]
    fn test_exists() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mirascope/calls.mdx", "");
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert!(storage.exists("mirascope/calls"));
        assert!(!storage.exists("mirascope/streams"));
    }

    #[test]
    fn test_with_patterns_rejects_bad_glob() {
        let err = FsStorage::with_patterns(PathBuf::from("docs"), &["[".to_owned()]).err().unwrap();
        assert_eq!(err.kind(), StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_default_patterns_match_content_files() {
        let storage = FsStorage::new(PathBuf::from("docs"));
        let matches = |p: &str| FsStorage::matches_patterns(&storage.watch_patterns, Path::new(p));

        assert!(matches("calls.mdx"));
        assert!(matches("mirascope/api/llm.md"));
        assert!(matches("_meta.json"));
        assert!(!matches("mirascope/logo.png"));
    }

    #[test]
    fn test_watch_returns_receiver_and_handle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());

        assert!(storage.watch().is_ok());
    }

    // Timing-sensitive: depends on the platform watcher backend.
    #[test]
    #[ignore]
    fn test_watch_reports_debounced_change() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "mirascope/calls.mdx", "# Calls");
        let storage = FsStorage::new(dir.path().to_path_buf());
        let (rx, _handle) = storage.watch().unwrap();
        std::thread::sleep(Duration::from_millis(100));

        for i in 0..3 {
            write(dir.path(), "mirascope/calls.mdx", &format!("# Edit {i}"));
            std::thread::sleep(Duration::from_millis(20));
        }
        write(dir.path(), "notes.txt", "ignored");

        let event = rx.wait_for(Duration::from_secs(2)).unwrap();
        assert_eq!(event.content_path().as_deref(), Some("mirascope/calls"));
        std::thread::sleep(Duration::from_millis(250));
        assert!(rx.poll().is_none());
    }

    #[test]
    #[ignore]
    fn test_watch_stops_with_handle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().to_path_buf());
        let (rx, handle) = storage.watch().unwrap();

        handle.stop();
        std::thread::sleep(Duration::from_millis(100));
        write(dir.path(), "new.mdx", "# New");
        std::thread::sleep(Duration::from_millis(250));

        assert!(rx.poll().is_none());
    }
}
