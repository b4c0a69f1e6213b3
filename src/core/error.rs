//! Error types for jv with helpful suggestions

use std::path::PathBuf;

use thiserror::Error;

/// Convenience Result type for jv operations
pub type Result<T> = std::result::Result<T, JvError>;

#[derive(Error, Debug)]
pub enum JvError {
    #[error("Failed to scan for Java installations: {0}")]
    Scan(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No {distributor} build of Java {version} for {arch}")]
    NotFound {
        distributor: String,
        version: String,
        arch: String,
    },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Extraction failed: {0}")]
    Extract(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to update environment: {0}")]
    Path(String),

    #[error("Registry error ({}): {message}", path.display())]
    Registry { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JvError {
    pub(crate) fn registry(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Registry {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Get a helpful suggestion for how to fix this error
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Scan(_) => Some("Check the configured search paths with: jv list-paths"),
            Self::Network(_) => Some(
                "Check your internet connection and try again.\nIf behind a proxy, set HTTP_PROXY/HTTPS_PROXY",
            ),
            Self::NotFound { .. } => Some(
                "Run: jv install (without a version) to see the versions the distributor offers",
            ),
            Self::Download(_) => Some("Retry the installation; partial downloads are discarded"),
            Self::Extract(_) => Some(
                "Remove the existing destination directory or choose another version, then retry",
            ),
            Self::PermissionDenied(_) => Some(
                "Re-run from an elevated shell (sudo on Unix, Administrator on Windows)",
            ),
            Self::Path(_) => Some("Run: jv doctor to inspect JAVA_HOME and PATH"),
            Self::Registry { .. } => Some(
                "Check ~/.config/jv/jv.json for syntax errors.\nRepair with: jv repair",
            ),
            Self::InvalidInput(_) | Self::Io(_) => None,
        }
    }
}

/// Format an error with its suggestion for display
pub fn format_error_with_suggestion(err: &JvError) -> String {
    let mut msg = format!("Error: {err}");
    if let Some(suggestion) = err.suggestion() {
        msg.push_str("\n\n💡 ");
        msg.push_str(suggestion);
    }
    msg
}
