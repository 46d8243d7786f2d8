use std::io;
use std::path::PathBuf;

use crate::tour::TourError;

/// Everything that can stop `bisup` from finishing.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// No prebuilt binary exists for the host.
    #[error("Unsupported platform: {os} {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The version lookup or the artifact download failed. `reason` is the
    /// transport's own error text.
    #[error("Failed to fetch {url}: {reason}")]
    NetworkFailure { url: String, reason: String },

    /// Neither a direct write nor the elevated path could place the binary.
    #[error("Permission denied for '{}': {reason}", .path.display())]
    PermissionDenied { path: PathBuf, reason: String },

    #[error("Could not determine your home directory, pass --dir explicitly")]
    HomeDirUnavailable,

    #[error(transparent)]
    Tour(#[from] TourError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl InstallError {
    /// Exit code `bisup` should terminate with for this error.
    ///
    /// A failing tool invocation hands its own exit code through to the shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::Tour(err) => err.exit_code(),
            _ => 1,
        }
    }

    pub(crate) fn permission_denied(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        InstallError::PermissionDenied { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;
