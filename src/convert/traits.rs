//! Trait seam between the orchestrator and the external converter

use crate::types::ConversionJob;
use async_trait::async_trait;

/// Something that turns one mirrored input into one artifact
///
/// The production implementation is [`CliConversionTool`](super::CliConversionTool),
/// which runs the external renderer in batch mode. Tests substitute recording
/// implementations.
#[async_trait]
pub trait ConversionTool: Send + Sync {
    /// Run one job to completion
    ///
    /// Returns once the work has finished; implementations must not leave
    /// anything running in the background.
    ///
    /// # Errors
    ///
    /// Returns `Error::ExternalTool` if the tool could not be run and
    /// `Error::ToolFailed` if it ran and reported failure.
    async fn convert(&self, job: &ConversionJob) -> crate::Result<()>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
