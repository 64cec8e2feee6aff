//! Persists fetched bytes into the flat mirror directory

use crate::error::{Error, Result};
use crate::types::LocalAsset;
use crate::utils::base_name;
use std::path::{Path, PathBuf};

/// Writes mirrored files as `<output_dir>/<base name of the remote path>`
///
/// Remote directory structure is discarded. Existing files are overwritten
/// without checking, so when two remote paths share a base name the one written
/// last wins.
#[derive(Clone, Debug)]
pub struct MirrorWriter {
    output_dir: PathBuf,
}

impl MirrorWriter {
    /// Writer targeting `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The mirror directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Local path a remote file is written to
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the remote path has no usable file name.
    pub fn local_path_for(&self, remote_path: &str) -> Result<PathBuf> {
        let name = base_name(remote_path).ok_or_else(|| Error::Write {
            path: self.output_dir.join(remote_path),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("remote path '{remote_path}' has no file name"),
            ),
        })?;
        Ok(self.output_dir.join(name))
    }

    /// Create the mirror directory if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| Error::Write {
                path: self.output_dir.clone(),
                source,
            })
    }

    /// Write `bytes` for `remote_path`, replacing any previous file of that name
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the directory or the file cannot be written.
    pub async fn store(&self, remote_path: &str, bytes: &[u8]) -> Result<LocalAsset> {
        let local_path = self.local_path_for(remote_path)?;
        self.ensure_dir().await?;

        tokio::fs::write(&local_path, bytes)
            .await
            .map_err(|source| Error::Write {
                path: local_path.clone(),
                source,
            })?;

        tracing::info!(
            remote = %remote_path,
            path = %local_path.display(),
            bytes = bytes.len(),
            "stored mirrored file"
        );

        Ok(LocalAsset {
            remote_path: remote_path.to_string(),
            local_path,
            size: bytes.len() as u64,
        })
    }
}
