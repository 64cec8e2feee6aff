//! Depth-first walk over a remote directory tree

use super::client::RepositoryClient;
use crate::error::{Error, Result};
use crate::types::{EntryKind, RemoteEntry};
use crate::utils::matches_suffix;
use futures::{Stream, TryStreamExt, stream};
use std::collections::VecDeque;

/// Lazily enumerates remote blobs under a root whose names end with a suffix
///
/// Directories are always descended, whatever their name. Traversal is pre-order:
/// a subdirectory is fully walked before its later siblings are looked at. Sibling
/// order is whatever the server returns.
///
/// The walk keeps an explicit stack of pending sibling queues instead of
/// recursing, and issues one listing request at a time as the stream is polled.
pub struct TreeWalker<'a> {
    client: &'a RepositoryClient,
    root: String,
    suffix: String,
}

impl<'a> TreeWalker<'a> {
    /// Walker over `root` (relative to the repository root, "" for the root itself)
    pub fn new(client: &'a RepositoryClient, root: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            client,
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    /// Stream of matching remote file paths
    ///
    /// The first listing failure is yielded as an error and ends the stream; no
    /// further directories are requested after it.
    pub fn walk(self) -> impl Stream<Item = Result<String>> + 'a {
        let state = WalkState {
            client: self.client,
            suffix: self.suffix,
            pending_root: Some(self.root),
            frames: Vec::new(),
        };

        stream::try_unfold(state, |mut state| async move {
            let next = state.advance().await?;
            Ok::<_, Error>(next.map(|path| (path, state)))
        })
    }

    /// Run the walk to completion and collect every matching path
    ///
    /// # Errors
    ///
    /// Returns the first listing error encountered.
    pub async fn collect_paths(self) -> Result<Vec<String>> {
        self.walk().try_collect().await
    }
}

struct WalkState<'a> {
    client: &'a RepositoryClient,
    suffix: String,
    pending_root: Option<String>,
    // One queue of not-yet-visited siblings per open directory, innermost last
    frames: Vec<VecDeque<RemoteEntry>>,
}

impl WalkState<'_> {
    async fn advance(&mut self) -> Result<Option<String>> {
        if let Some(root) = self.pending_root.take() {
            self.descend(&root).await?;
        }

        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Ok(None);
            };
            let Some(entry) = frame.pop_front() else {
                self.frames.pop();
                continue;
            };

            match entry.kind {
                EntryKind::Tree => self.descend(&entry.path).await?,
                EntryKind::Blob if matches_suffix(&entry.name, &self.suffix) => {
                    return Ok(Some(entry.path));
                }
                EntryKind::Blob | EntryKind::Other => {}
            }
        }
    }

    async fn descend(&mut self, path: &str) -> Result<()> {
        let entries = self.client.list_tree(path).await?;
        tracing::debug!(path = %path, entries = entries.len(), "listed remote directory");
        self.frames.push(entries.into());
        Ok(())
    }
}
