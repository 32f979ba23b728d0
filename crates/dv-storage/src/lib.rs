//! Content storage for dv.
//!
//! The registry knows *which* documents exist; a [`Storage`] backend knows how
//! to load their bodies. Content paths are the registry's `DocInfo::path`
//! values (`mirascope/calls`, `mirascope/api/index`), never file paths.
//!
//! The crate provides:
//! - [`Storage`] trait with `read()`, `exists()` and `watch()`
//! - [`FsStorage`] resolving `<root>/<path>.mdx`, then `<root>/<path>.md`
//! - [`MockStorage`] for tests (behind the `mock` feature flag)
//! - [`StorageEvent`]s delivered over a channel, debounced per file
//!
//! # Example
//!
//! ```no_run
//! use dv_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new("content/docs".into());
//! let body = storage.read("mirascope/calls")?;
//! # Ok::<(), dv_storage::StorageError>(())
//! ```

mod debouncer;
mod event;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use event::{StorageEvent, StorageEventKind, StorageEventReceiver, WatchHandle};
pub use fs::{DEFAULT_WATCH_PATTERNS, FsStorage};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
