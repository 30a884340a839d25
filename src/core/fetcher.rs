use async_trait::async_trait;

use crate::core::{channel::Channel, interval::Interval, reading::Reading};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FetchMode {
    /// High-resolution 15-minute samples.
    Raw,

    /// Hourly values aggregated by the provider with the accumulation transformation.
    HourlyAccumulation,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    /// The request did not go through: network error, timeout, or non-success status.
    #[error("transport failure: {0:#}")]
    Transport(anyhow::Error),

    /// The response went through but could not be understood.
    #[error("malformed response: {0:#}")]
    Malformed(anyhow::Error),
}

impl FetchFailure {
    /// Only transport failures have a chance to go away on their own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[async_trait]
pub trait ReadingFetcher: Sync {
    /// Fetch the readings of the single chunk.
    ///
    /// Unparseable individual readings are dropped, never failing the whole chunk.
    async fn fetch(
        &self,
        channel: &Channel,
        chunk: Interval,
        mode: FetchMode,
    ) -> Result<Vec<Reading>, FetchFailure>;
}
