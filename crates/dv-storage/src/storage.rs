//! Body sources and their failures.
//!
//! Every path handed to a [`Storage`] is a content path as the registry
//! produces it (`mirascope/index`, `mirascope/learn/calls`). How that maps to
//! files or keys is up to the backend.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::event::{StorageEventReceiver, WatchHandle};

type Cause = Box<dyn Error + Send + Sync>;

/// Backend-independent failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    /// Malformed content path, or one that leaves the content root.
    InvalidPath,
    /// The backend itself is unusable, e.g. no watcher could be started.
    Unavailable,
    Other,
}

impl fmt::Display for StorageErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "no such document",
            Self::PermissionDenied => "access denied",
            Self::InvalidPath => "invalid content path",
            Self::Unavailable => "backend unavailable",
            Self::Other => "read failed",
        })
    }
}

impl From<io::ErrorKind> for StorageErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }
}

/// A body could not be served.
///
/// Always names the backend and the path it was working on: a content path,
/// or the resolved file once the backend got that far.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    backend: &'static str,
    path: PathBuf,
    cause: Option<Cause>,
}

impl StorageError {
    #[must_use]
    pub fn new(backend: &'static str, kind: StorageErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            backend,
            path: path.into(),
            cause: None,
        }
    }

    #[must_use]
    pub fn missing(backend: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::new(backend, StorageErrorKind::NotFound, path)
    }

    /// Classify an I/O failure on `path`.
    #[must_use]
    pub fn from_io(backend: &'static str, path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::new(backend, err.kind().into(), path).caused_by(err)
    }

    #[must_use]
    pub fn caused_by(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying error, if it is an `E`.
    #[must_use]
    pub fn cause<E: Error + 'static>(&self) -> Option<&E> {
        self.cause.as_deref()?.downcast_ref()
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path.display(), self.kind, self.backend)?;
        match &self.cause {
            Some(cause) => write!(f, ": {cause}"),
            None => Ok(()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Where document bodies come from.
///
/// Bundles load bodies in parallel, so backends are shared across threads.
pub trait Storage: Send + Sync {
    /// Body of the document at `path`.
    ///
    /// # Errors
    ///
    /// Fails when there is no body or it cannot be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Whether `path` has a body. Errors count as absent.
    fn exists(&self, path: &str) -> bool;

    /// Subscribe to content changes.
    ///
    /// The default never yields an event, for backends that cannot tell.
    ///
    /// # Errors
    ///
    /// Fails when change notification cannot be set up.
    fn watch(&self) -> Result<(StorageEventReceiver, WatchHandle), StorageError> {
        Ok((StorageEventReceiver::never(), WatchHandle::detached()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(StorageError: Send, Sync);

    #[test]
    fn test_missing_document() {
        let err = StorageError::missing("mock", "mirascope/calls");

        assert!(err.is_not_found());
        assert_eq!(err.backend(), "mock");
        assert_eq!(err.path(), Path::new("mirascope/calls"));
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "mirascope/calls: no such document (mock)");
    }

    struct Fixed;

    impl Storage for Fixed {
        fn read(&self, path: &str) -> Result<String, StorageError> {
            match path {
                "mirascope/index" => Ok("# Mirascope".to_owned()),
                _ => Err(StorageError::missing("fixed", path)),
            }
        }

        fn exists(&self, path: &str) -> bool {
            self.read(path).is_ok()
        }
    }

    #[test]
    fn test_backend_needs_only_read_and_exists() {
        let storage: &dyn Storage = &Fixed;

        assert_eq!(storage.read("mirascope/index").unwrap(), "# Mirascope");
        assert!(!storage.exists("mirascope/calls"));
        let (events, _handle) = storage.watch().unwrap();
        assert!(events.wait().is_none());
    }

    #[test]
    fn test_io_errors_are_classified() {
        let cases = [
            (io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (io::ErrorKind::PermissionDenied, StorageErrorKind::PermissionDenied),
            (io::ErrorKind::InvalidData, StorageErrorKind::Other),
        ];
        for (io_kind, expected) in cases {
            let err = StorageError::from_io("fs", "a.md", io::Error::new(io_kind, "x"));
            assert_eq!(err.kind(), expected, "{io_kind:?}");
        }
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let err = StorageError::from_io(
            "fs",
            "/content/docs/mirascope/calls.mdx",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );

        assert_eq!(
            err.cause::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::NotFound)
        );
        assert!(err.cause::<fmt::Error>().is_none());
        assert_eq!(
            err.to_string(),
            "/content/docs/mirascope/calls.mdx: no such document (fs): file not found"
        );
    }
}
