use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::sleep;

use crate::{
    core::{
        checkpoint::{Checkpoint, CheckpointResolver, FetchPolicy},
        fetcher::{FetchFailure, ReadingFetcher},
        interval::Interval,
        reading::Reading,
        series::{Accumulate, AggregateHourly, Series, SeriesKind},
        statistic::{StatisticData, StatisticPoint},
    },
    prelude::*,
    recorder::Recorder,
};

#[must_use]
#[derive(Copy, Clone, Debug, bon::Builder)]
pub struct RetryPolicy {
    /// Additional attempts after the first failed one.
    pub max_retries: u32,

    #[builder(into)]
    pub delay: Duration,
}

/// Chunk that could not be fetched even after the retries.
#[derive(Debug)]
pub struct FailedChunk {
    pub chunk: Interval,
    pub failure: FetchFailure,
}

/// Outcome of a single ingestion cycle.
#[must_use]
#[derive(Debug)]
pub struct CycleReport {
    pub window: Interval,
    pub n_chunks: usize,
    pub n_readings: usize,
    pub n_points: usize,
    pub failed_chunks: Vec<FailedChunk>,
}

impl CycleReport {
    const fn new(window: Interval) -> Self {
        Self { window, n_chunks: 0, n_readings: 0, n_points: 0, failed_chunks: Vec::new() }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}

/// Single pass of the pipeline: checkpoint, window, chunks, fetch, aggregate, import.
#[derive(bon::Builder)]
pub struct Cycle<'a, F, R> {
    fetcher: &'a F,
    recorder: &'a R,
    policy: FetchPolicy,
    retry: RetryPolicy,
}

impl<F: ReadingFetcher, R: Recorder> Cycle<'_, F, R> {
    #[instrument(skip_all, fields(statistic_id = series.statistic_id()))]
    pub async fn run(&self, series: &Series, now: DateTime<Utc>) -> Result<CycleReport> {
        let resolver = CheckpointResolver(self.recorder);
        let checkpoint = match series.kind {
            SeriesKind::Power => Checkpoint {
                last_timestamp: resolver.resolve_rate(series.statistic_id()).await?,
                last_sum: None,
            },
            SeriesKind::Energy => resolver.resolve_cumulative(series.statistic_id()).await?,
        };

        let window = self.policy.window(checkpoint.last_timestamp, now);
        info!(?window, "fetching…");
        let mut report = CycleReport::new(window);

        // Everything is gathered before aggregating, since hours may span adjacent chunks:
        let mut readings = Vec::new();
        for chunk in window.chunks(self.policy.max_chunk_span) {
            report.n_chunks += 1;
            match self.fetch_chunk(series, chunk).await {
                Ok(chunk_readings) => readings.extend(chunk_readings),
                Err(failure) => {
                    warn!(?chunk, "giving up on the chunk: {failure:#}");
                    report.failed_chunks.push(FailedChunk { chunk, failure });
                }
            }
        }
        let readings = deduplicate(readings);
        report.n_readings = readings.len();

        let rows: Vec<StatisticData> = match series.kind {
            SeriesKind::Power => readings
                .aggregate_hourly()
                .into_iter()
                .map(|point| StatisticPoint::from(point).into())
                .collect(),
            SeriesKind::Energy => readings
                .into_iter()
                // An hour still in progress would later be skipped as already accumulated:
                .filter(|reading| reading.timestamp + TimeDelta::hours(1) <= now)
                .accumulate(checkpoint)
                .into_iter()
                .map(|point| StatisticPoint::from(point).into())
                .collect(),
        };
        report.n_points = rows.len();

        if rows.is_empty() {
            info!(n_readings = report.n_readings, "nothing to import");
        } else {
            self.recorder
                .import_statistics(&series.metadata, &rows)
                .await
                .with_context(|| format!("failed to import `{}`", series.statistic_id()))?;
            info!(n_readings = report.n_readings, n_points = report.n_points, "imported");
        }
        if !report.is_complete() {
            warn!(n_failed_chunks = report.failed_chunks.len(), "the cycle is incomplete");
        }
        Ok(report)
    }

    /// Run the cycle for each series in turn, a failing series does not stop the others.
    ///
    /// Returns the reports of the succeeded series, and the first error if any series failed.
    pub async fn run_all<'s>(
        &self,
        all_series: &'s [Series],
        now: DateTime<Utc>,
    ) -> (Vec<(&'s Series, CycleReport)>, Option<Error>) {
        let mut reports = Vec::with_capacity(all_series.len());
        let mut first_error = None;
        for series in all_series {
            match self.run(series, now).await {
                Ok(report) => reports.push((series, report)),
                Err(error) => {
                    error!(statistic_id = series.statistic_id(), "the cycle failed: {error:#}");
                    first_error.get_or_insert(error);
                }
            }
        }
        (reports, first_error)
    }

    async fn fetch_chunk(
        &self,
        series: &Series,
        chunk: Interval,
    ) -> Result<Vec<Reading>, FetchFailure> {
        let mode = series.kind.fetch_mode();
        let mut n_retries = 0;
        loop {
            match self.fetcher.fetch(&series.channel, chunk, mode).await {
                Ok(readings) => {
                    debug!(?chunk, n_readings = readings.len(), "fetched");
                    return Ok(readings);
                }
                Err(failure) if failure.is_retryable() && n_retries < self.retry.max_retries => {
                    n_retries += 1;
                    warn!(?chunk, n_retries, "retrying: {failure:#}");
                    sleep(self.retry.delay).await;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

/// Order the readings by time and drop the repeated timestamps, which adjacent chunks may share.
fn deduplicate(mut readings: Vec<Reading>) -> Vec<Reading> {
    readings.sort_by_key(|reading| reading.timestamp);
    let n_readings = readings.len();
    readings.dedup_by_key(|reading| reading.timestamp);
    if readings.len() != n_readings {
        debug!(n_duplicates = n_readings - readings.len(), "dropped duplicate readings");
    }
    readings
}
