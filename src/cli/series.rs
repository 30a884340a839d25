use clap::Parser;
use enumset::EnumSet;

use crate::{
    core::{
        channel::Channel,
        series::{Series, SeriesKind},
    },
    prelude::*,
};

#[derive(Parser)]
pub struct SeriesArgs {
    #[clap(
        long = "series",
        env = "SERIES",
        value_delimiter = ',',
        num_args = 1..,
        default_value = "power,energy",
    )]
    kinds: Vec<SeriesKind>,
}

impl SeriesArgs {
    #[must_use]
    pub fn kinds(&self) -> EnumSet<SeriesKind> {
        self.kinds.iter().copied().collect()
    }

    pub fn build(&self, channel: &Channel) -> Result<Vec<Series>> {
        self.kinds().iter().map(|kind| Series::try_new(kind, channel.clone())).collect()
    }
}
