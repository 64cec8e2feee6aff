//! Remote repository access
//!
//! [`RepositoryClient`] talks to the GitLab REST API (tree listing and raw file
//! endpoints) for one project at one ref. [`TreeWalker`] drives the listing
//! endpoint over a subtree and yields the paths of matching blobs as a lazy stream.
//!
//! ## Usage
//!
//! ```no_run
//! use asset_mirror::config::RepositoryConfig;
//! use asset_mirror::remote::{RepositoryClient, TreeWalker};
//! use futures::TryStreamExt;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RepositoryClient::new(RepositoryConfig::new("cable-mc/cobblemon-assets", "master"))?;
//!
//! let walk = TreeWalker::new(&client, "blockbench/pokemon/gen1", ".bbmodel").walk();
//! futures::pin_mut!(walk);
//! while let Some(path) = walk.try_next().await? {
//!     let bytes = client.fetch_raw(&path).await?;
//!     println!("{path}: {} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod walker;

pub use client::RepositoryClient;
pub use walker::TreeWalker;
