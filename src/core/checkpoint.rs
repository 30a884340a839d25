use chrono::{DateTime, TimeDelta, Utc};
use enumset::EnumSet;

use crate::{
    core::{
        interval::{Interval, ceil_hour, floor_hour},
        statistic::StatisticField,
    },
    prelude::*,
    recorder::Recorder,
};

/// Last persisted point of a series, read once at the start of a cycle.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Checkpoint {
    pub last_timestamp: Option<DateTime<Utc>>,
    pub last_sum: Option<f64>,
}

impl Checkpoint {
    /// Check whether the timestamp is strictly after the checkpoint.
    #[must_use]
    pub fn is_before(&self, timestamp: DateTime<Utc>) -> bool {
        self.last_timestamp.is_none_or(|last_timestamp| timestamp > last_timestamp)
    }
}

/// Reads the checkpoints from the recorder.
pub struct CheckpointResolver<'a, R>(pub &'a R);

impl<R: Recorder> CheckpointResolver<'_, R> {
    /// Timestamp of the latest rate point.
    #[instrument(skip_all, fields(statistic_id = statistic_id))]
    pub async fn resolve_rate(&self, statistic_id: &str) -> Result<Option<DateTime<Utc>>> {
        let last = self
            .0
            .get_last_statistics(statistic_id, 1, EnumSet::only(StatisticField::State))
            .await
            .with_context(|| format!("failed to query the last state of `{statistic_id}`"))?;
        let last_timestamp = last.first().map(|data| data.start);
        debug!(?last_timestamp, "resolved");
        Ok(last_timestamp)
    }

    /// Timestamp and running sum of the latest cumulative point.
    ///
    /// Both are taken from the very same row, so that the fetch window and the running sum
    /// never disagree.
    #[instrument(skip_all, fields(statistic_id = statistic_id))]
    pub async fn resolve_cumulative(&self, statistic_id: &str) -> Result<Checkpoint> {
        let last = self
            .0
            .get_last_statistics(statistic_id, 1, StatisticField::State | StatisticField::Sum)
            .await
            .with_context(|| format!("failed to query the last sum of `{statistic_id}`"))?;
        let checkpoint = last.first().map_or_else(Checkpoint::default, |data| Checkpoint {
            last_timestamp: Some(data.start),
            last_sum: data.sum,
        });
        debug!(?checkpoint, "resolved");
        Ok(checkpoint)
    }
}

/// Decides which time range a cycle should fetch.
#[must_use]
#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct FetchPolicy {
    /// How far back to go when the series has never been imported.
    pub initial_backfill: TimeDelta,

    /// Minimal look-back, even if the last import happened just now.
    pub minimum_window: TimeDelta,

    /// Maximal time span of a single API request.
    pub max_chunk_span: TimeDelta,
}

impl FetchPolicy {
    /// Calculate the fetch window ending now.
    ///
    /// The window always covers the last known point, so that the latest hour gets rebuilt
    /// from complete data, and it is never shorter than the minimal window.
    /// The resumed start is truncated down to the whole hour.
    ///
    /// The initial window is never longer than the backfill: its start is rounded up
    /// to the next whole hour, so the first hour bucket is still complete.
    pub fn window(&self, last_timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Interval {
        let start = match last_timestamp {
            None => {
                let start = now - self.initial_backfill;
                ceil_hour(start).unwrap_or(start)
            }
            Some(last_timestamp) => {
                let start = last_timestamp.min(now - self.minimum_window);
                floor_hour(start).unwrap_or(start)
            }
        };
        Interval::new(start, now)
    }
}
