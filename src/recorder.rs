//! Statistics storage.

mod file;
#[cfg(test)]
mod memory;
mod store;

use async_trait::async_trait;
use enumset::EnumSet;

pub use self::file::FileRecorder;
#[cfg(test)]
pub use self::memory::MemoryRecorder;
use crate::{
    core::statistic::{StatisticData, StatisticField, StatisticMetadata},
    prelude::*,
};

#[async_trait]
pub trait Recorder: Sync {
    /// Insert or replace the rows of the series, keyed by the row start.
    ///
    /// The import is atomic: either all the rows are stored, or none.
    async fn import_statistics(
        &self,
        metadata: &StatisticMetadata,
        rows: &[StatisticData],
    ) -> Result;

    /// Get the latest `n` rows which have all the `fields` set, newest first.
    ///
    /// The returned rows only contain the requested fields.
    async fn get_last_statistics(
        &self,
        statistic_id: &str,
        n: usize,
        fields: EnumSet<StatisticField>,
    ) -> Result<Vec<StatisticData>>;
}
