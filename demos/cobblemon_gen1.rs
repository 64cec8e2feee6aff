//! Mirror the generation 1 Cobblemon Blockbench assets and convert the models to GLB
//!
//! This example demonstrates the full pipeline:
//! - Mirroring `.bbmodel` models and `.png` textures from a GitLab subtree
//! - Converting the mirrored models with Blockbench in batch mode
//!
//! Expects `Blockbench_5.0.7.AppImage` and `export_gltf.js` in the working directory.
//! Set `RUST_LOG=asset_mirror=debug` to see individual requests.

use asset_mirror::config::{ConvertConfig, MirrorConfig, RepositoryConfig};
use asset_mirror::{ConversionOrchestrator, Mirror};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const PROJECT_ID: &str = "cable-mc/cobblemon-assets";
const BRANCH: &str = "master";
const BASE_PATH: &str = "blockbench/pokemon/gen1";

const MODELS_DIR: &str = "bbmodels_gen1";
const TEXTURES_DIR: &str = "png_gen1";
const GLTF_DIR: &str = "gltf_gen1";

const APPIMAGE: &str = "./Blockbench_5.0.7.AppImage";
const EXPORT_SCRIPT: &str = "export_gltf.js";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let repository = RepositoryConfig::new(PROJECT_ID, BRANCH);
    let mut failures = 0;

    for (output_dir, suffix) in [(MODELS_DIR, ".bbmodel"), (TEXTURES_DIR, ".png")] {
        let mirror = Mirror::new(MirrorConfig::new(
            repository.clone(),
            BASE_PATH,
            output_dir,
            suffix,
        ))?;
        let report = mirror.run().await?;

        println!("✓ Mirrored {} {} files into {}", report.stored.len(), suffix, output_dir);
        for failure in &report.failed {
            eprintln!("✗ {}: {}", failure.remote_path, failure.error);
        }
        failures += report.failed.len();
    }

    let mut convert = ConvertConfig::new(EXPORT_SCRIPT, MODELS_DIR, GLTF_DIR);
    convert.tool_path = Some(PathBuf::from(APPIMAGE));
    let report = ConversionOrchestrator::from_config(convert)?
        .convert_all()
        .await?;

    if report.attempted == 0 {
        println!("Nothing to convert.");
    } else {
        println!("✓ Converted {} models into {}", report.converted.len(), GLTF_DIR);
    }

    if failures > 0 {
        return Err(format!("{failures} files could not be downloaded").into());
    }
    Ok(())
}
