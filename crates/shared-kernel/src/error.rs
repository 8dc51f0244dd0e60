// crates/shared-kernel/src/error.rs
use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Closed set of failure categories surfaced by file operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoErrorKind {
    /// The handle has no live descriptor for the requested direction.
    NotOpen,
    NotFound,
    PermissionDenied,
    /// Low-level read failure other than a clean end-of-file.
    ReadError,
    /// Short or failed write.
    WriteError,
    /// Invalid mode combination or option value, raised before any I/O.
    Configuration,
}

impl IoErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOpen => "not-open",
            Self::NotFound => "not-found",
            Self::PermissionDenied => "permission-denied",
            Self::ReadError => "read-error",
            Self::WriteError => "write-error",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for IoErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the human-readable message for an error category.
///
/// `detail` is appended after a colon when non-empty, except for the
/// not-found and permission-denied categories which only name the path.
pub fn format_io_error(kind: IoErrorKind, path: &Path, detail: &str) -> String {
    let with_detail = |base: String| {
        if detail.is_empty() { base } else { format!("{base}: {detail}") }
    };

    match kind {
        IoErrorKind::NotOpen => {
            with_detail(format!("File operation failed 'file is not open': {}", path.display()))
        }
        IoErrorKind::NotFound => format!("File not found: {}", path.display()),
        IoErrorKind::PermissionDenied => {
            format!("Permission denied while accessing: {}", path.display())
        }
        IoErrorKind::ReadError => with_detail("Low-level read error".to_string()),
        IoErrorKind::WriteError => with_detail("Low-level write error".to_string()),
        IoErrorKind::Configuration => with_detail("Invalid configuration".to_string()),
    }
}

fn render(kind: &IoErrorKind, path: &Path, detail: &str) -> String {
    format_io_error(*kind, path, detail)
}

/// Error type returned by every reader, writer and handle operation.
#[derive(Debug, Error)]
#[error("{}", render(.kind, .path, .detail))]
pub struct FileIoError {
    kind: IoErrorKind,
    path: PathBuf,
    detail: String,
    #[source]
    source: Option<io::Error>,
}

pub type Result<T> = std::result::Result<T, FileIoError>;

impl FileIoError {
    pub fn new(kind: IoErrorKind, path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self { kind, path: path.into(), detail: detail.into(), source: None }
    }

    /// Attaches the underlying platform error and uses its message as detail
    /// when none was given.
    #[must_use]
    pub fn with_source(mut self, source: io::Error) -> Self {
        if self.detail.is_empty() {
            self.detail = source.to_string();
        }
        self.source = Some(source);
        self
    }

    pub fn not_open(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::new(IoErrorKind::NotOpen, path, detail)
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::new(IoErrorKind::ReadError, path, "").with_source(source)
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::new(IoErrorKind::WriteError, path, "").with_source(source)
    }

    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::new(IoErrorKind::Configuration, PathBuf::new(), detail)
    }

    /// Classifies a failed open: missing target and denied access get their
    /// own categories, anything else is reported as not open.
    pub fn from_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let kind = match source.kind() {
            io::ErrorKind::NotFound => IoErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            _ => IoErrorKind::NotOpen,
        };
        Self::new(kind, path, "").with_source(source)
    }

    #[inline]
    pub const fn kind(&self) -> IoErrorKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the same error bound to `path` when it was raised without one.
    #[must_use]
    pub fn at_path(mut self, path: &Path) -> Self {
        if self.path.as_os_str().is_empty() {
            self.path = path.to_path_buf();
        }
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == IoErrorKind::NotFound
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == IoErrorKind::Configuration
    }
}

impl From<FileIoError> for io::Error {
    fn from(err: FileIoError) -> Self {
        let kind = match err.kind {
            IoErrorKind::NotOpen => io::ErrorKind::NotConnected,
            IoErrorKind::NotFound => io::ErrorKind::NotFound,
            IoErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
            IoErrorKind::ReadError | IoErrorKind::WriteError => {
                err.source.as_ref().map_or(io::ErrorKind::Other, io::Error::kind)
            }
            IoErrorKind::Configuration => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
