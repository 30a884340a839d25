use itertools::Itertools;

use crate::{
    core::{checkpoint::Checkpoint, reading::Reading, statistic::SumPoint},
    prelude::*,
};

impl<T> Accumulate for T where T: ?Sized {}

pub trait Accumulate {
    /// Fold the readings into the running sum, continuing from the checkpoint.
    ///
    /// Readings are ordered by time, duplicate timestamps are dropped (the first one wins),
    /// and readings at or before the checkpoint are skipped since their values are
    /// already included into the checkpoint sum.
    fn accumulate(self, checkpoint: Checkpoint) -> Vec<SumPoint>
    where
        Self: Sized + IntoIterator<Item = Reading>,
    {
        let mut readings = self.into_iter().collect_vec();
        let n_readings = readings.len();
        readings.sort_by_key(|reading| reading.timestamp);
        readings.dedup_by_key(|reading| reading.timestamp);
        if readings.len() != n_readings {
            debug!(n_duplicates = n_readings - readings.len(), "dropped duplicate readings");
        }

        let mut running_sum = checkpoint.last_sum.unwrap_or(0.0);
        readings
            .into_iter()
            .filter(|reading| checkpoint.is_before(reading.timestamp))
            .map(|reading| {
                running_sum += reading.value;
                SumPoint { start: reading.timestamp, value: reading.value, running_sum }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_resume_from_checkpoint() {
        let checkpoint = Checkpoint { last_timestamp: Some(at(9)), last_sum: Some(100.0) };
        let points = vec![
            Reading::new(at(9), 5.0),
            Reading::new(at(10), 3.0),
            Reading::new(at(11), 2.0),
        ]
        .accumulate(checkpoint);
        assert_eq!(
            points,
            [
                SumPoint { start: at(10), value: 3.0, running_sum: 103.0 },
                SumPoint { start: at(11), value: 2.0, running_sum: 105.0 },
            ]
        );
    }

    #[test]
    fn test_without_checkpoint() {
        let points = vec![Reading::new(at(11), 2.0), Reading::new(at(10), 3.0)]
            .accumulate(Checkpoint::default());
        assert_eq!(
            points,
            [
                SumPoint { start: at(10), value: 3.0, running_sum: 3.0 },
                SumPoint { start: at(11), value: 2.0, running_sum: 5.0 },
            ]
        );
    }

    #[test]
    fn test_duplicates_are_counted_once() {
        let points = vec![
            Reading::new(at(10), 3.0),
            Reading::new(at(11), 2.0),
            Reading::new(at(10), 3.0),
        ]
        .accumulate(Checkpoint::default());
        assert_eq!(points.len(), 2);
        assert_abs_diff_eq!(points[1].running_sum, 5.0);
    }

    #[test]
    fn test_rerun_with_updated_checkpoint_is_empty() {
        let readings = vec![Reading::new(at(10), 3.0), Reading::new(at(11), 2.0)];
        let points = readings.clone().accumulate(Checkpoint::default());
        let last = points.last().unwrap();
        let checkpoint =
            Checkpoint { last_timestamp: Some(last.start), last_sum: Some(last.running_sum) };
        assert!(readings.accumulate(checkpoint).is_empty());
    }

    #[test]
    fn test_sum_without_timestamp_seeds_the_total() {
        let checkpoint = Checkpoint { last_timestamp: None, last_sum: Some(7.0) };
        let points = vec![Reading::new(at(10), 3.0)].accumulate(checkpoint);
        assert_abs_diff_eq!(points[0].running_sum, 10.0);
    }

    fn readings() -> impl Strategy<Value = Vec<Reading>> {
        prop::collection::vec((0_i64..500, 0.0_f64..100.0), 0..50).prop_map(|samples| {
            samples
                .into_iter()
                .map(|(hour, value)| {
                    let timestamp =
                        DateTime::from_timestamp(1_740_000_000 + hour * 3600, 0).unwrap();
                    Reading::new(timestamp, value)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn running_sum_is_non_decreasing(readings in readings(), seed in 0.0_f64..1000.0) {
            let checkpoint = Checkpoint { last_timestamp: None, last_sum: Some(seed) };
            let points = readings.accumulate(checkpoint);
            let mut previous = seed;
            for point in &points {
                prop_assert!(point.running_sum >= previous);
                previous = point.running_sum;
            }
            for (left, right) in points.iter().tuple_windows() {
                prop_assert!(left.start < right.start);
            }
        }

        #[test]
        fn rerun_is_idempotent(readings in readings()) {
            let points = readings.clone().accumulate(Checkpoint::default());
            let checkpoint = points.last().map_or_else(Checkpoint::default, |last| Checkpoint {
                last_timestamp: Some(last.start),
                last_sum: Some(last.running_sum),
            });
            prop_assert!(readings.accumulate(checkpoint).is_empty());
        }
    }
}
