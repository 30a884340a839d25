use std::time::Duration;

use chrono::TimeDelta;
use clap::Parser;

use crate::core::{checkpoint::FetchPolicy, cycle::RetryPolicy};

#[derive(Parser)]
pub struct FetchArgs {
    /// How many days to import when a series has never been imported before.
    #[clap(
        long = "initial-backfill-days",
        env = "INITIAL_BACKFILL_DAYS",
        default_value = "180",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    initial_backfill_days: u16,

    /// Minimal number of days to re-fetch on every cycle.
    #[clap(long = "minimum-fetch-days", env = "MINIMUM_FETCH_DAYS", default_value = "2")]
    minimum_fetch_days: u16,

    /// Maximal number of days per single API request.
    #[clap(
        long = "maximum-chunk-days",
        env = "MAXIMUM_CHUNK_DAYS",
        default_value = "30",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    maximum_chunk_days: u16,

    /// Additional attempts for a chunk that failed on the transport level.
    #[clap(long = "fetch-retries", env = "FETCH_RETRIES", default_value = "2")]
    retries: u32,

    #[clap(long = "fetch-retry-delay", env = "FETCH_RETRY_DELAY", default_value = "5s")]
    retry_delay: humantime::Duration,
}

impl FetchArgs {
    pub fn policy(&self) -> FetchPolicy {
        FetchPolicy::builder()
            .initial_backfill(TimeDelta::days(self.initial_backfill_days.into()))
            .minimum_window(TimeDelta::days(self.minimum_fetch_days.into()))
            .max_chunk_span(TimeDelta::days(self.maximum_chunk_days.into()))
            .build()
    }

    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_retries(self.retries)
            .delay(Duration::from(self.retry_delay))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Args {
        #[clap(flatten)]
        fetch: FetchArgs,
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["leneda-importer"]).fetch;
        let policy = args.policy();
        assert_eq!(policy.initial_backfill, TimeDelta::days(180));
        assert_eq!(policy.minimum_window, TimeDelta::days(2));
        assert_eq!(policy.max_chunk_span, TimeDelta::days(30));
        let retry = args.retry();
        assert_eq!(retry.max_retries, 2);
        assert_eq!(retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_chunk_is_rejected() {
        assert!(Args::try_parse_from(["leneda-importer", "--maximum-chunk-days", "0"]).is_err());
    }
}
