//! Conversion phase: mirrored models to glTF through an external renderer
//!
//! The phase is decoupled from the download phase by the filesystem: its inputs
//! are whatever files currently sit in the input directory.
//!
//! ## Architecture
//!
//! - [`ConversionTool`]: one job in, one artifact out
//! - [`CliConversionTool`]: runs the external binary in batch mode with a fixed
//!   script, one blocking child process per job
//! - [`ConversionOrchestrator`]: discovers jobs in file name order and runs them
//!   one after another, applying the configured [`FailurePolicy`](crate::config::FailurePolicy)
//!
//! ## Usage
//!
//! ```no_run
//! use asset_mirror::config::ConvertConfig;
//! use asset_mirror::convert::ConversionOrchestrator;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConvertConfig::new("export_gltf.js", "bbmodels_gen1", "gltf_gen1");
//! let orchestrator = ConversionOrchestrator::from_config(config)?;
//!
//! let report = orchestrator.convert_all().await?;
//! println!("{} conversions attempted", report.attempted);
//! # Ok(())
//! # }
//! ```

mod cli;
mod orchestrator;
mod traits;

pub use cli::CliConversionTool;
pub use orchestrator::ConversionOrchestrator;
pub use traits::ConversionTool;
