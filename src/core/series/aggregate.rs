use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

use crate::{
    core::{interval::floor_hour, reading::Reading, statistic::RatePoint},
    prelude::*,
};

impl<T> AggregateHourly for T where T: ?Sized {}

pub trait AggregateHourly {
    /// Bucket the readings by hour and calculate mean, min, and max of each bucket.
    ///
    /// The output is ordered by the hour and does not depend on the input order.
    fn aggregate_hourly(self) -> Vec<RatePoint>
    where
        Self: Sized + IntoIterator<Item = Reading>,
    {
        let mut buckets: BTreeMap<DateTime<Utc>, Vec<OrderedFloat<f64>>> = BTreeMap::new();
        for reading in self {
            let Some(hour_start) = floor_hour(reading.timestamp) else {
                warn!(?reading, "skipped the reading with unrepresentable hour");
                continue;
            };
            buckets.entry(hour_start).or_default().push(OrderedFloat(reading.value));
        }
        buckets
            .into_iter()
            .filter_map(|(start, mut values)| {
                // Fixed summation order keeps the mean bit-identical under permutations:
                values.sort_unstable();
                let min = values.first()?.0;
                let max = values.last()?.0;
                #[expect(clippy::cast_precision_loss)]
                let mean = values.iter().map(|value| value.0).sum::<f64>() / values.len() as f64;
                Some(RatePoint { start, mean, min, max })
            })
            .collect()
    }
}
