use chrono::Utc;
use clap::Parser;

use crate::{
    cli::{
        fetch::FetchArgs,
        heartbeat::HeartbeatArgs,
        leneda::LenedaArgs,
        recorder::RecorderArgs,
        series::SeriesArgs,
    },
    core::cycle::Cycle,
    prelude::*,
    tables::{build_failures_table, build_reports_table},
};

#[derive(Parser)]
pub struct ImportArgs {
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

impl ImportArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = self.leneda.new_client()?;
        let recorder = self.recorder.open()?;
        let all_series = self.series.build(&self.leneda.channel.channel())?;
        let cycle = Cycle::builder()
            .fetcher(&api)
            .recorder(&recorder)
            .policy(self.fetch.policy())
            .retry(self.fetch.retry())
            .build();

        let (reports, error) = cycle.run_all(&all_series, Utc::now()).await;
        let reports = reports.iter().map(|(series, report)| (*series, report));
        println!("{}", build_reports_table(reports.clone()));
        if reports.clone().any(|(_, report)| !report.is_complete()) {
            println!("{}", build_failures_table(reports));
        }

        if let Some(error) = error {
            return Err(error);
        }
        self.heartbeat.heartbeat().send().await;
        Ok(())
    }
}
