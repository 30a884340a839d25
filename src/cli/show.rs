use clap::{Parser, Subcommand};

use crate::{
    cli::{leneda::ChannelArgs, recorder::RecorderArgs},
    core::series::{Series, SeriesKind},
    prelude::*,
    recorder::Recorder,
    tables::{build_metadata_table, build_statistics_table},
};

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(flatten)]
    recorder: RecorderArgs,

    #[command(subcommand)]
    command: ShowCommand,
}

#[derive(Subcommand)]
enum ShowCommand {
    /// List the stored series.
    #[clap(name = "series")]
    Series,

    /// Print the latest rows of a series.
    #[clap(name = "rows")]
    Rows(ShowRowsArgs),
}

#[derive(Parser)]
struct ShowRowsArgs {
    #[clap(flatten)]
    channel: ChannelArgs,

    #[clap(long = "kind", value_enum, default_value = "energy")]
    kind: SeriesKind,

    /// Number of the latest rows.
    #[clap(long = "limit", default_value = "24")]
    limit: usize,
}

impl ShowArgs {
    pub async fn run(self) -> Result {
        let recorder = self.recorder.open()?;
        match self.command {
            ShowCommand::Series => {
                println!("{}", build_metadata_table(&recorder.list_metadata()?));
            }
            ShowCommand::Rows(args) => {
                let series = Series::try_new(args.kind, args.channel.channel())?;
                let mut rows = recorder
                    .get_last_statistics(
                        series.statistic_id(),
                        args.limit,
                        args.kind.statistic_fields(),
                    )
                    .await?;
                info!(statistic_id = series.statistic_id(), n_rows = rows.len(), "fetched");
                rows.reverse();
                println!("{}", build_statistics_table(&rows));
            }
        }
        Ok(())
    }
}
