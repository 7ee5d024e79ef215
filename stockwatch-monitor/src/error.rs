//! Failure taxonomy for monitoring passes.

use thiserror::Error;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The guild has no country or no alert channel yet.
    #[error("guild {guild_id} has no country or alert channel configured")]
    ConfigurationMissing { guild_id: u64 },

    #[error("stock source unavailable: {0:#}")]
    SourceUnavailable(#[source] anyhow::Error),

    #[error("tenant store unavailable: {0:#}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("notification sink unavailable: {0:#}")]
    SinkUnavailable(#[source] anyhow::Error),
}
