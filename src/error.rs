use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A regex filter pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Neither the requested directory, its ancestors, home, nor root is readable.
    #[error("No reachable directory from {}", .0.display())]
    NoReachableDirectory(PathBuf),
}

/// Classification of a failed directory read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavErrorKind {
    NotFound,
    PermissionDenied,
    Io,
    Other,
}

/// A failed navigation, rendered as the transient status message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("Directory not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    /// Device-level failure (`EIO`).
    #[error("I/O error reading {}: {detail}", .path.display())]
    Io { path: PathBuf, detail: String },

    #[error("Cannot open {}: {detail}", .path.display())]
    Other { path: PathBuf, detail: String },
}

/// `EIO` is 5 on Linux, macOS and the BSDs.
#[cfg(unix)]
const EIO: i32 = 5;

impl NavError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => NavError::NotFound { path },
            io::ErrorKind::PermissionDenied => NavError::PermissionDenied { path },
            _ if is_device_error(err) => NavError::Io {
                path,
                detail: err.to_string(),
            },
            _ => NavError::Other {
                path,
                detail: err.to_string(),
            },
        }
    }

    pub fn not_found(path: &Path) -> Self {
        NavError::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub fn kind(&self) -> NavErrorKind {
        match self {
            NavError::NotFound { .. } => NavErrorKind::NotFound,
            NavError::PermissionDenied { .. } => NavErrorKind::PermissionDenied,
            NavError::Io { .. } => NavErrorKind::Io,
            NavError::Other { .. } => NavErrorKind::Other,
        }
    }

    /// The directory the failed navigation was headed for.
    pub fn path(&self) -> &Path {
        match self {
            NavError::NotFound { path }
            | NavError::PermissionDenied { path }
            | NavError::Io { path, .. }
            | NavError::Other { path, .. } => path,
        }
    }
}

#[cfg(unix)]
fn is_device_error(err: &io::Error) -> bool {
    err.raw_os_error() == Some(EIO)
}

#[cfg(not(unix))]
fn is_device_error(_err: &io::Error) -> bool {
    false
}
