//! Download phase: walk, fetch and store
//!
//! [`Mirror`] walks the configured subtree, fetches every matching blob at the
//! configured ref and hands the bytes to a [`MirrorWriter`]. Files are processed one
//! at a time, in walk order.
//!
//! ## Failure handling
//!
//! - A listing failure aborts the run.
//! - A write failure aborts the run.
//! - A fetch failure, or a remote path with no usable local file name, follows
//!   [`MirrorConfig::on_fetch_error`]: with
//!   [`FailurePolicy::FailFast`] the run aborts, with
//!   [`FailurePolicy::CollectAndReport`] the file is skipped and recorded in
//!   [`MirrorReport::failed`].
//!
//! ## Name collisions
//!
//! The mirror is flat. Two remote files with the same base name end up as one local
//! file holding whichever was fetched last. This is kept on purpose; every such
//! overwrite within a run is logged and counted in [`MirrorReport::collisions`].

mod writer;

pub use writer::MirrorWriter;

use crate::config::{FailurePolicy, MirrorConfig};
use crate::error::{Error, Result};
use crate::remote::{RepositoryClient, TreeWalker};
use crate::types::{FetchFailure, MirrorReport};
use futures::TryStreamExt;
use std::collections::HashSet;

/// One configured mirror job
pub struct Mirror {
    config: MirrorConfig,
    client: RepositoryClient,
    writer: MirrorWriter,
}

impl Mirror {
    /// Prepare a mirror run
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: MirrorConfig) -> Result<Self> {
        config.validate()?;
        let client = RepositoryClient::new(config.repository.clone())?;
        let writer = MirrorWriter::new(&config.output_dir);
        Ok(Self {
            config,
            client,
            writer,
        })
    }

    /// Configuration of this mirror
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Mirror every matching remote file into the output directory
    ///
    /// Every run re-downloads everything; running twice against an unchanged
    /// remote tree leaves the same files with the same contents.
    ///
    /// # Errors
    ///
    /// Returns the first listing or write error, and the first fetch error when
    /// the fetch policy is [`FailurePolicy::FailFast`].
    pub async fn run(&self) -> Result<MirrorReport> {
        self.writer.ensure_dir().await?;

        tracing::info!(
            project = %self.config.repository.project_id,
            git_ref = %self.config.repository.git_ref,
            root = %self.config.root_path,
            suffix = %self.config.suffix_filter,
            output = %self.writer.output_dir().display(),
            "starting mirror run"
        );

        let walk = TreeWalker::new(
            &self.client,
            self.config.root_path.as_str(),
            self.config.suffix_filter.as_str(),
        )
        .walk();
        futures::pin_mut!(walk);

        let mut report = MirrorReport::default();
        let mut written = HashSet::new();

        while let Some(remote_path) = walk.try_next().await? {
            // Checked before fetching so an unusable name costs no request
            if let Err(e) = self.writer.local_path_for(&remote_path) {
                self.record_failure(&mut report, remote_path, e)?;
                continue;
            }

            let bytes = match self.client.fetch_raw(&remote_path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.record_failure(&mut report, remote_path, e)?;
                    continue;
                }
            };

            let asset = self.writer.store(&remote_path, &bytes).await?;
            if !written.insert(asset.local_path.clone()) {
                report.collisions += 1;
                tracing::warn!(
                    remote = %remote_path,
                    path = %asset.local_path.display(),
                    "overwrote a file mirrored earlier in this run (same base name)"
                );
            }
            report.stored.push(asset);
        }

        tracing::info!(
            stored = report.stored.len(),
            failed = report.failed.len(),
            collisions = report.collisions,
            "mirror run finished"
        );

        Ok(report)
    }

    /// Apply the fetch failure policy to one file that cannot be mirrored
    fn record_failure(&self, report: &mut MirrorReport, remote_path: String, e: Error) -> Result<()> {
        match self.config.on_fetch_error {
            FailurePolicy::FailFast => Err(e),
            FailurePolicy::CollectAndReport => {
                tracing::warn!(path = %remote_path, error = %e, "skipping file that could not be mirrored");
                report.failed.push(FetchFailure {
                    remote_path,
                    error: e.to_string(),
                });
                Ok(())
            }
        }
    }
}
