//! # asset-mirror
//!
//! Mirrors a subtree of a GitLab repository to a local directory, keeping only
//! files with a given suffix, and converts the mirrored Blockbench models to glTF
//! by driving the Blockbench binary in batch mode.
//!
//! ## Design Philosophy
//!
//! - **Two decoupled phases** - downloading and converting only meet on disk
//! - **Explicit configuration** - every run takes immutable config values, no globals
//! - **Sequential** - one request or one child process in flight at a time
//! - **Deliberate failure policies** - fail-fast or collect-and-report, chosen per phase
//!
//! ## Quick Start
//!
//! ```no_run
//! use asset_mirror::config::{ConvertConfig, MirrorConfig, RepositoryConfig};
//! use asset_mirror::{ConversionOrchestrator, Mirror};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = RepositoryConfig::new("cable-mc/cobblemon-assets", "master");
//!
//!     let mirror = Mirror::new(MirrorConfig::new(
//!         repository,
//!         "blockbench/pokemon/gen1",
//!         "bbmodels_gen1",
//!         ".bbmodel",
//!     ))?;
//!     let report = mirror.run().await?;
//!     println!("mirrored {} files", report.stored.len());
//!
//!     let orchestrator = ConversionOrchestrator::from_config(ConvertConfig::new(
//!         "export_gltf.js",
//!         "bbmodels_gen1",
//!         "gltf_gen1",
//!     ))?;
//!     orchestrator.convert_all().await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Conversion phase (external renderer)
pub mod convert;
/// Error types
pub mod error;
/// Download phase (walk, fetch, store)
pub mod mirror;
/// GitLab REST access
pub mod remote;
/// Core types and reports
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{ConvertConfig, FailurePolicy, MirrorConfig, Pagination, RepositoryConfig};
pub use convert::{CliConversionTool, ConversionOrchestrator, ConversionTool};
pub use error::{Error, Result};
pub use mirror::{Mirror, MirrorWriter};
pub use remote::{RepositoryClient, TreeWalker};
pub use types::{
    ConversionJob, ConversionReport, EntryKind, FetchFailure, JobFailure, LocalAsset,
    MirrorReport, RemoteEntry,
};
