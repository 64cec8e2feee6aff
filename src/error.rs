//! Error types for asset-mirror
//!
//! Every variant carries the remote path, local path or input file involved so that
//! a failure reaching the top level can be reported without further context.
//! Failures are reported, not classified: there is no error code scheme.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for asset-mirror operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for asset-mirror
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// The tree listing endpoint answered with a non-success status
    #[error("failed to list remote directory '{path}': HTTP {status}")]
    Listing {
        /// Remote directory that was being listed
        path: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The raw file endpoint answered with a non-success status
    #[error("failed to fetch remote file '{path}': HTTP {status}")]
    Fetch {
        /// Remote file that was being fetched
        path: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// Transport-level failure (connection refused, timeout, malformed body)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Writing a mirrored file to disk failed
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Local path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading a local input (directory listing or file metadata) failed
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        /// Local path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree listing body could not be decoded
    #[error("malformed listing for remote directory '{path}': {source}")]
    Decode {
        /// Remote directory whose listing was malformed
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// External tool could not be started or waited on
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// External tool ran but exited unsuccessfully
    #[error("conversion of '{}' failed: tool exited with {}", .input.display(), describe_code(.code))]
    ToolFailed {
        /// Input file of the failing job
        input: PathBuf,
        /// Exit code, `None` if the process was terminated by a signal
        code: Option<i32>,
    },

    /// Operation not supported (missing binary)
    #[error("not supported: {0}")]
    NotSupported(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] naming the offending key
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
