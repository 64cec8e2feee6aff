//! Configuration types for asset-mirror
//!
//! Each run is parameterized by immutable values passed to the component
//! constructors. Nothing is read from globals or the environment, so several runs
//! with different parameters can share one process.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Default GitLab REST API base
pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";

/// Entries requested per tree listing page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Environment variable forcing a display backend the headless converter accepts
pub const DISPLAY_BACKEND_VAR: &str = "ELECTRON_OZONE_PLATFORM_HINT";

/// How the tree walker treats directories with more entries than one page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Request only the first page of each directory; further entries are dropped
    /// and a warning is logged
    FirstPage,
    /// Follow the `X-Next-Page` header until the listing is exhausted (default)
    #[default]
    Follow,
}

/// What a batch does when one of its units fails
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the remaining batch and propagate the error
    FailFast,
    /// Log the failure, record it in the run report and continue
    CollectAndReport,
}

/// Remote repository coordinates shared by the walker and the fetcher
///
/// Listing and fetching always use the same `git_ref`, so a mirror run never mixes
/// revisions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// API base URL (default: "https://gitlab.com/api/v4")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Project id or full path (e.g. "cable-mc/cobblemon-assets")
    pub project_id: String,

    /// Branch, tag or commit to read (default: "master")
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,

    /// Entries per listing page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Pagination behavior for directory listings
    #[serde(default)]
    pub pagination: Pagination,

    /// Per-request timeout in seconds (default: 60)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl RepositoryConfig {
    /// Coordinates for `project_id` at `git_ref`, everything else defaulted
    pub fn new(project_id: impl Into<String>, git_ref: impl Into<String>) -> Self {
        Self {
            api_base: default_api_base(),
            project_id: project_id.into(),
            git_ref: git_ref.into(),
            page_size: DEFAULT_PAGE_SIZE,
            pagination: Pagination::default(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api_base)
            .map_err(|e| Error::config("api_base", format!("invalid API base URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::config(
                "api_base",
                format!("unsupported URL scheme '{}'", base.scheme()),
            ));
        }
        if self.project_id.trim().is_empty() {
            return Err(Error::config("project_id", "project id must not be empty"));
        }
        if self.git_ref.trim().is_empty() {
            return Err(Error::config("ref", "ref must not be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size", "page size must be greater than zero"));
        }
        Ok(())
    }
}

/// Scope and destination of one mirror run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Repository to read from
    #[serde(flatten)]
    pub repository: RepositoryConfig,

    /// Directory inside the repository where the walk starts ("" = repository root)
    #[serde(default)]
    pub root_path: String,

    /// Local directory receiving the flattened files
    pub output_dir: PathBuf,

    /// Only blobs whose name ends with this suffix are mirrored (e.g. ".bbmodel")
    pub suffix_filter: String,

    /// Behavior when a single file cannot be fetched (default: collect_and_report)
    #[serde(default = "default_fetch_policy")]
    pub on_fetch_error: FailurePolicy,
}

impl MirrorConfig {
    /// Mirror every `suffix_filter` blob under `root_path` into `output_dir`
    pub fn new(
        repository: RepositoryConfig,
        root_path: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        suffix_filter: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            root_path: root_path.into(),
            output_dir: output_dir.into(),
            suffix_filter: suffix_filter.into(),
            on_fetch_error: default_fetch_policy(),
        }
    }

    /// Check the settings before any request is made
    pub fn validate(&self) -> Result<()> {
        self.repository.validate()?;
        if self.suffix_filter.is_empty() {
            return Err(Error::config(
                "suffix_filter",
                "suffix filter must not be empty",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config("output_dir", "output directory must be set"));
        }
        Ok(())
    }
}

/// Environment variable set for the converter unless the caller already has it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvDefault {
    /// Variable name
    pub name: String,
    /// Value used when the variable is absent from the current environment
    pub value: String,
}

/// Conversion phase settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Explicit path to the converter binary (searched on PATH if None)
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// Binary name searched on PATH when `tool_path` is unset (default: "blockbench")
    #[serde(default = "default_tool_name")]
    pub tool_name: String,

    /// Script handed to the converter with `--script`
    pub script_path: PathBuf,

    /// Directory scanned for inputs (normally a mirror output directory)
    pub input_dir: PathBuf,

    /// Directory receiving converted artifacts
    pub output_dir: PathBuf,

    /// Suffix of files picked up from `input_dir` (default: ".bbmodel")
    #[serde(default = "default_input_suffix")]
    pub input_suffix: String,

    /// Extension of produced artifacts, without dot (default: "glb")
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Environment defaults for the child process
    #[serde(default = "default_env_defaults")]
    pub env_defaults: Vec<EnvDefault>,

    /// Behavior when one conversion exits non-zero (default: fail_fast)
    #[serde(default = "default_tool_policy")]
    pub on_tool_error: FailurePolicy,
}

impl ConvertConfig {
    /// Convert `input_dir` into `output_dir` with `script_path`, everything else defaulted
    pub fn new(
        script_path: impl Into<PathBuf>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool_path: None,
            tool_name: default_tool_name(),
            script_path: script_path.into(),
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            input_suffix: default_input_suffix(),
            output_extension: default_output_extension(),
            env_defaults: default_env_defaults(),
            on_tool_error: default_tool_policy(),
        }
    }

    /// Check the settings before any job is discovered
    pub fn validate(&self) -> Result<()> {
        if self.input_suffix.is_empty() {
            return Err(Error::config("input_suffix", "input suffix must not be empty"));
        }
        let ext = self.output_extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(Error::config(
                "output_extension",
                format!("invalid output extension '{}'", self.output_extension),
            ));
        }
        // Artifacts matching the input suffix would be picked up as inputs
        if self.input_dir == self.output_dir && format!(".{ext}").ends_with(&self.input_suffix) {
            return Err(Error::config(
                "output_dir",
                "output would overwrite the inputs being converted",
            ));
        }
        Ok(())
    }
}

// Default value functions
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_ref() -> String {
    "master".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_fetch_policy() -> FailurePolicy {
    FailurePolicy::CollectAndReport
}

fn default_tool_policy() -> FailurePolicy {
    FailurePolicy::FailFast
}

fn default_tool_name() -> String {
    "blockbench".to_string()
}

fn default_input_suffix() -> String {
    ".bbmodel".to_string()
}

fn default_output_extension() -> String {
    "glb".to_string()
}

fn default_env_defaults() -> Vec<EnvDefault> {
    vec![EnvDefault {
        name: DISPLAY_BACKEND_VAR.to_string(),
        value: "x11".to_string(),
    }]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
