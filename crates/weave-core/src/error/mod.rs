//! Error types and result aliases for weave operations.
//!
//! Provides a unified error type that covers every failure the install and
//! clean passes can surface, with actionable suggestions for the CLI.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Unified error type for all weave operations
#[derive(Error, Debug)]
pub enum WeaveError {
    // Lookup errors
    #[error("Cannot find workspace.json in {dir} or any parent directory")]
    MissingDescriptor { dir: Utf8PathBuf },

    #[error("Cannot find package.json in {dir}")]
    MissingManifest { dir: Utf8PathBuf },

    #[error("Invalid package at {path}")]
    InvalidLinkedPackage { path: Utf8PathBuf },

    #[error("Failed to parse {path}: {message}")]
    JsonParse { path: Utf8PathBuf, message: String },

    // External installer errors
    #[error("`{command}` failed with exit code {status:?}\n{output}")]
    ExternalTool {
        command: String,
        status: Option<i32>,
        output: String,
    },

    // IO errors
    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for weave operations
pub type WeaveResult<T> = Result<T, WeaveError>;

impl WeaveError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an error for a path that cannot be represented as UTF-8
    pub fn non_utf8(path: impl AsRef<std::path::Path>) -> Self {
        Self::NonUtf8Path {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Check if this error came from the external installer
    pub fn is_external(&self) -> bool {
        matches!(self, WeaveError::ExternalTool { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            WeaveError::MissingDescriptor { .. } => {
                Some("Create a workspace.json at the root of your workspace")
            },
            WeaveError::MissingManifest { .. } => {
                Some("Check that the directory is a module and contains a package.json")
            },
            WeaveError::InvalidLinkedPackage { .. } => {
                Some("Check the path mapped for this module in the links table of workspace.json")
            },
            WeaveError::ExternalTool { .. } => {
                Some("Re-run with --verbose to see the full npm output")
            },
            WeaveError::JsonParse { .. } => Some("Fix the JSON syntax of the file and try again"),
            _ => None,
        }
    }
}
