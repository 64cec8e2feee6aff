//! Drives a [`ConversionTool`] over the files of one directory

use super::cli::CliConversionTool;
use super::traits::ConversionTool;
use crate::config::{ConvertConfig, FailurePolicy};
use crate::error::{Error, Result};
use crate::types::{ConversionJob, ConversionReport, JobFailure};
use crate::utils::{matches_suffix, output_path_for};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Converts every input in `input_dir` into `output_dir`, one job at a time
pub struct ConversionOrchestrator {
    config: ConvertConfig,
    tool: Arc<dyn ConversionTool>,
}

impl ConversionOrchestrator {
    /// Orchestrator using an explicit tool
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: ConvertConfig, tool: Arc<dyn ConversionTool>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tool })
    }

    /// Orchestrator using the external binary described by `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid and
    /// `Error::NotSupported` if the binary cannot be located.
    pub fn from_config(config: ConvertConfig) -> Result<Self> {
        let tool = CliConversionTool::from_config(&config)?;
        Self::new(config, Arc::new(tool))
    }

    /// Configuration of this orchestrator
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Jobs for the current contents of the input directory, sorted by file name
    ///
    /// Only regular files directly inside `input_dir` whose name ends with the
    /// input suffix are picked up. A missing input directory yields no jobs.
    ///
    /// Entries that vanish or turn out to be dangling symlinks while the
    /// directory is scanned are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` naming the directory or entry that cannot be read.
    pub async fn discover_jobs(&self) -> Result<Vec<ConversionJob>> {
        let input_dir = &self.config.input_dir;
        let read_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| Error::Read { path, source }
        };

        let mut entries = match tokio::fs::read_dir(input_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %input_dir.display(), "input directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(read_error(input_dir)(e)),
        };

        let mut inputs: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error(input_dir))? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping input with non UTF-8 name");
                continue;
            };
            if !matches_suffix(name, &self.config.input_suffix) {
                continue;
            }
            // Follows symlinks, so linked inputs count as files
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => inputs.push(path),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "skipping input that no longer resolves to a file");
                }
                Err(e) => return Err(read_error(&path)(e)),
            }
        }
        inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut jobs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let Some(output) = output_path_for(
                &input,
                &self.config.output_dir,
                &self.config.input_suffix,
                &self.config.output_extension,
            ) else {
                tracing::warn!(path = %input.display(), "skipping input with nothing left once the suffix is removed");
                continue;
            };
            jobs.push(ConversionJob { input, output });
        }

        Ok(jobs)
    }

    /// Run the tool once per discovered job, in file name order
    ///
    /// Each invocation completes before the next starts. An empty input set is
    /// not an error. With [`FailurePolicy::FailFast`] the first failing job
    /// aborts the batch and no later job is attempted; with
    /// [`FailurePolicy::CollectAndReport`] every job is attempted and failures
    /// are listed in the report.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the input directory cannot be read, `Error::Write` if
    /// the output directory cannot be created, and the failing job's error under
    /// [`FailurePolicy::FailFast`].
    pub async fn convert_all(&self) -> Result<ConversionReport> {
        let jobs = self.discover_jobs().await?;
        let mut report = ConversionReport::default();

        if jobs.is_empty() {
            tracing::info!(
                dir = %self.config.input_dir.display(),
                suffix = %self.config.input_suffix,
                "nothing to convert"
            );
            return Ok(report);
        }

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|source| Error::Write {
                path: self.config.output_dir.clone(),
                source,
            })?;

        tracing::info!(jobs = jobs.len(), tool = self.tool.name(), "starting conversion run");

        for job in jobs {
            tracing::info!(
                input = %job.input.display(),
                output = %job.output.display(),
                "converting"
            );
            report.attempted += 1;

            match self.tool.convert(&job).await {
                Ok(()) => report.converted.push(job.output),
                Err(e) => match self.config.on_tool_error {
                    FailurePolicy::FailFast => return Err(e),
                    FailurePolicy::CollectAndReport => {
                        tracing::warn!(input = %job.input.display(), error = %e, "conversion failed");
                        report.failed.push(JobFailure {
                            job,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        tracing::info!(
            attempted = report.attempted,
            converted = report.converted.len(),
            failed = report.failed.len(),
            "conversion run finished"
        );

        Ok(report)
    }
}
