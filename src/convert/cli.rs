//! Converter backed by an external batch-mode binary (Blockbench)

use super::traits::ConversionTool;
use crate::config::{ConvertConfig, EnvDefault};
use crate::types::ConversionJob;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs `<binary> --no-sandbox --disable-gpu --script <script> -- <input> <output>`
///
/// Each job spawns one child process and waits for it. The child is created with
/// `kill_on_drop`, so it never outlives the future driving it, and it is reaped on
/// both the success and the failure path.
///
/// # Examples
///
/// ```no_run
/// use asset_mirror::convert::{CliConversionTool, ConversionTool};
/// use asset_mirror::types::ConversionJob;
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tool = CliConversionTool::from_path("blockbench", "export_gltf.js")
///     .expect("blockbench not found in PATH");
///
/// tool.convert(&ConversionJob {
///     input: PathBuf::from("bbmodels_gen1/abra.bbmodel"),
///     output: PathBuf::from("gltf_gen1/abra.glb"),
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CliConversionTool {
    binary_path: PathBuf,
    script_path: PathBuf,
    env_defaults: Vec<EnvDefault>,
}

impl CliConversionTool {
    /// Tool with an explicit binary and script, no environment defaults
    pub fn new(binary_path: impl Into<PathBuf>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            script_path: script_path.into(),
            env_defaults: Vec::new(),
        }
    }

    /// Attempt to find `binary_name` in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path(binary_name: &str, script_path: impl Into<PathBuf>) -> Option<Self> {
        which::which(binary_name)
            .ok()
            .map(|binary| Self::new(binary, script_path))
    }

    /// Tool described by a [`ConvertConfig`]
    ///
    /// Uses `tool_path` when set, otherwise searches PATH for `tool_name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotSupported` when no binary can be located.
    pub fn from_config(config: &ConvertConfig) -> crate::Result<Self> {
        let tool = match &config.tool_path {
            Some(path) => Self::new(path, &config.script_path),
            None => Self::from_path(&config.tool_name, &config.script_path).ok_or_else(|| {
                crate::Error::NotSupported(format!(
                    "conversion tool '{}' not found in PATH",
                    config.tool_name
                ))
            })?,
        };
        Ok(tool.with_env_defaults(config.env_defaults.clone()))
    }

    /// Environment variables set for the child unless already present
    pub fn with_env_defaults(mut self, env_defaults: Vec<EnvDefault>) -> Self {
        self.env_defaults = env_defaults;
        self
    }

    /// Binary this tool runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Command line for one job
    pub fn command(&self, job: &ConversionJob) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--script")
            .arg(&self.script_path)
            .arg("--")
            .arg(&job.input)
            .arg(&job.output)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        for default in &self.env_defaults {
            if std::env::var_os(&default.name).is_none() {
                cmd.env(&default.name, &default.value);
            }
        }

        cmd
    }
}

#[async_trait]
impl ConversionTool for CliConversionTool {
    async fn convert(&self, job: &ConversionJob) -> crate::Result<()> {
        let mut child = self.command(job).spawn().map_err(|e| {
            crate::Error::ExternalTool(format!(
                "Failed to execute {}: {}",
                self.binary_path.display(),
                e
            ))
        })?;

        let status = child.wait().await.map_err(|e| {
            crate::Error::ExternalTool(format!(
                "Failed to wait for {} on '{}': {}",
                self.binary_path.display(),
                job.input.display(),
                e
            ))
        })?;

        if !status.success() {
            return Err(crate::Error::ToolFailed {
                input: job.input.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "cli-blockbench"
    }
}
