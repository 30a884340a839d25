mod fetch;
mod heartbeat;
mod import;
mod leneda;
mod recorder;
mod series;
mod show;
mod watch;

use clap::{Parser, Subcommand};

use crate::cli::{import::ImportArgs, show::ShowArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single import cycle for every selected series.
    #[clap(name = "import")]
    Import(Box<ImportArgs>),

    /// Periodically import every selected series until interrupted.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Inspect the stored statistics.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),
}
