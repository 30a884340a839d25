use std::{sync::Arc, time::Duration};

use bon::Builder;
use chrono::Utc;
use clap::Parser;
use tokio::{
    signal,
    task::JoinSet,
    time::{MissedTickBehavior, interval},
};

use crate::{
    api::{heartbeat::Heartbeat, leneda},
    cli::{
        fetch::FetchArgs,
        heartbeat::HeartbeatArgs,
        leneda::LenedaArgs,
        recorder::RecorderArgs,
        series::SeriesArgs,
    },
    core::{
        checkpoint::FetchPolicy,
        cycle::{Cycle, RetryPolicy},
        series::Series,
    },
    prelude::*,
    recorder::FileRecorder,
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long = "polling-interval", env = "POLLING_INTERVAL", default_value = "2h")]
    polling_interval: humantime::Duration,

    #[clap(flatten)]
    leneda: LenedaArgs,

    #[clap(flatten)]
    series: SeriesArgs,

    #[clap(flatten)]
    fetch: FetchArgs,

    #[clap(flatten)]
    recorder: RecorderArgs,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let api = Arc::new(self.leneda.new_client()?);
        let recorder = Arc::new(self.recorder.open()?);

        let mut watchers = JoinSet::new();
        for series in self.series.build(&self.leneda.channel.channel())? {
            let watcher = Watcher::builder()
                .api(Arc::clone(&api))
                .recorder(Arc::clone(&recorder))
                .policy(self.fetch.policy())
                .retry(self.fetch.retry())
                .heartbeat(self.heartbeat.heartbeat())
                .series(series)
                .interval(self.polling_interval)
                .build();
            watchers.spawn(watcher.run());
        }
        info!(n_series = watchers.len(), "watching…");

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                info!("interrupted, stopping…");
                watchers.shutdown().await;
                Ok(())
            }
            Some(result) = watchers.join_next() => {
                result.context("a watcher has crashed")?
            }
        }
    }
}

/// Runs the cycles of a single series on its own timer.
#[derive(Builder)]
struct Watcher {
    api: Arc<leneda::Api>,
    recorder: Arc<FileRecorder>,
    policy: FetchPolicy,
    retry: RetryPolicy,
    heartbeat: Heartbeat,
    series: Series,

    #[builder(into)]
    interval: Duration,
}

impl Watcher {
    #[instrument(skip_all, fields(statistic_id = self.series.statistic_id()))]
    async fn run(self) -> Result {
        let cycle = Cycle::builder()
            .fetcher(self.api.as_ref())
            .recorder(self.recorder.as_ref())
            .policy(self.policy)
            .retry(self.retry)
            .build();
        let mut interval = interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match cycle.run(&self.series, Utc::now()).await {
                Ok(report) => {
                    info!(
                        n_points = report.n_points,
                        n_failed_chunks = report.failed_chunks.len(),
                        "cycle finished",
                    );
                    self.heartbeat.send().await;
                }
                Err(error) => {
                    error!("the cycle failed, retrying on the next tick: {error:#}");
                }
            }
        }
    }
}
