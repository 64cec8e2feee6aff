//! Core types shared by the mirror and conversion phases

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a node in the remote repository
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory
    Tree,
    /// File
    Blob,
    /// Anything else the server reports (submodule commits); never visited
    #[serde(other)]
    Other,
}

/// One entry of a tree listing response
///
/// Transient: produced by a listing request and consumed by the walker right away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Node kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Base name of the node
    pub name: String,
    /// Full path from the repository root
    pub path: String,
}

/// A file in the mirror directory that came from a remote blob
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalAsset {
    /// Remote path the bytes were fetched from
    pub remote_path: String,
    /// Where the bytes were written
    pub local_path: PathBuf,
    /// Number of bytes written
    pub size: u64,
}

/// One unit of work for the external converter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionJob {
    /// Mirrored file handed to the converter
    pub input: PathBuf,
    /// Artifact path: `<output_dir>/<input stem>.<output extension>`
    pub output: PathBuf,
}

/// A remote file that could not be fetched during a mirror run
#[derive(Clone, Debug)]
pub struct FetchFailure {
    /// Remote path of the file
    pub remote_path: String,
    /// Rendered error
    pub error: String,
}

/// Outcome of a mirror run
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct MirrorReport {
    /// Files written, in walker order
    pub stored: Vec<LocalAsset>,
    /// Files skipped because their fetch failed
    pub failed: Vec<FetchFailure>,
    /// Writes that replaced a file stored earlier in the same run
    pub collisions: usize,
}

impl MirrorReport {
    /// True when every discovered file was stored
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A conversion job whose tool invocation failed
#[derive(Clone, Debug)]
pub struct JobFailure {
    /// The failing job
    pub job: ConversionJob,
    /// Rendered error
    pub error: String,
}

/// Outcome of a conversion run
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct ConversionReport {
    /// Number of tool invocations started
    pub attempted: usize,
    /// Artifacts produced by successful invocations
    pub converted: Vec<PathBuf>,
    /// Jobs whose invocation failed
    pub failed: Vec<JobFailure>,
}

impl ConversionReport {
    /// True when every attempted job succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
