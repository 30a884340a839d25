use std::collections::BTreeMap;

use enumset::EnumSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::statistic::{StatisticData, StatisticField, StatisticMetadata},
    prelude::*,
};

#[must_use]
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    series: BTreeMap<String, StoredSeries>,
}

#[derive(Clone, Serialize, Deserialize)]
struct StoredSeries {
    metadata: StatisticMetadata,

    /// Ordered by the start, unique.
    #[serde(default)]
    rows: Vec<StatisticData>,
}

impl Store {
    /// Upsert the rows and replace the metadata.
    ///
    /// Returns the number of newly inserted rows.
    pub fn import(
        &mut self,
        metadata: &StatisticMetadata,
        rows: &[StatisticData],
    ) -> Result<usize> {
        ensure!(!metadata.statistic_id.is_empty(), "statistic ID must not be empty");
        ensure!(
            rows.iter().tuple_windows().all(|(left, right)| left.start < right.start),
            "rows of `{}` must be strictly ordered by the start",
            metadata.statistic_id,
        );

        let series = self
            .series
            .entry(metadata.statistic_id.clone())
            .or_insert_with(|| StoredSeries { metadata: metadata.clone(), rows: Vec::new() });
        series.metadata = metadata.clone();

        let mut n_inserted = 0;
        for row in rows {
            match series.rows.binary_search_by_key(&row.start, |stored| stored.start) {
                Ok(index) => series.rows[index] = *row,
                Err(index) => {
                    series.rows.insert(index, *row);
                    n_inserted += 1;
                }
            }
        }
        Ok(n_inserted)
    }

    pub fn last(
        &self,
        statistic_id: &str,
        n: usize,
        fields: EnumSet<StatisticField>,
    ) -> Vec<StatisticData> {
        self.series.get(statistic_id).map_or_else(Vec::new, |series| {
            series
                .rows
                .iter()
                .rev()
                .filter(|row| row.has_all(fields))
                .take(n)
                .map(|row| row.project(fields))
                .collect()
        })
    }

    /// Metadata of all the series, ordered by the statistic ID.
    pub fn metadata(&self) -> impl Iterator<Item = &StatisticMetadata> {
        self.series.values().map(|series| &series.metadata)
    }
}
