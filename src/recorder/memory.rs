use std::sync::Mutex;

use async_trait::async_trait;
use enumset::EnumSet;

use crate::{
    core::statistic::{StatisticData, StatisticField, StatisticMetadata},
    prelude::*,
    recorder::{Recorder, store::Store},
};

/// Volatile recorder.
#[derive(Default)]
pub struct MemoryRecorder(Mutex<Store>);

impl MemoryRecorder {
    fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> Result<T> {
        let mut store = self.0.lock().map_err(|_| anyhow!("the statistics store is poisoned"))?;
        Ok(f(&mut store))
    }
}

#[async_trait]
impl Recorder for MemoryRecorder {
    async fn import_statistics(
        &self,
        metadata: &StatisticMetadata,
        rows: &[StatisticData],
    ) -> Result {
        let n_inserted = self.with_store(|store| store.import(metadata, rows))??;
        debug!(statistic_id = metadata.statistic_id, n_rows = rows.len(), n_inserted, "imported");
        Ok(())
    }

    async fn get_last_statistics(
        &self,
        statistic_id: &str,
        n: usize,
        fields: EnumSet<StatisticField>,
    ) -> Result<Vec<StatisticData>> {
        self.with_store(|store| store.last(statistic_id, n, fields))
    }
}
