use std::fmt::{Debug, Formatter};

use chrono::{DateTime, TimeDelta, Timelike, Utc};

/// Truncate the timestamp down to the whole hour.
#[must_use]
pub fn floor_hour(timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
    timestamp.with_nanosecond(0)?.with_second(0)?.with_minute(0)
}

/// Round the timestamp up to the whole hour.
#[must_use]
pub fn ceil_hour(timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let floor = floor_hour(timestamp)?;
    if floor == timestamp { Some(floor) } else { floor.checked_add_signed(TimeDelta::hours(1)) }
}

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }

    /// Split the interval into contiguous chunks, each spanning at most `max_span`.
    ///
    /// An empty interval or a non-positive span produce no chunks.
    pub const fn chunks(self, max_span: TimeDelta) -> Chunks {
        Chunks { remaining: self, max_span }
    }
}

/// Lazy chunk sequence produced by [`Interval::chunks`].
///
/// Clone it to iterate over the same chunks again.
#[must_use]
#[derive(Clone, Debug)]
pub struct Chunks {
    remaining: Interval,
    max_span: TimeDelta,
}

impl Iterator for Chunks {
    type Item = Interval;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() || self.max_span <= TimeDelta::zero() {
            return None;
        }
        let end = self
            .remaining
            .start
            .checked_add_signed(self.max_span)
            .map_or(self.remaining.end, |end| end.min(self.remaining.end));
        let chunk = Interval::new(self.remaining.start, end);
        self.remaining.start = end;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use itertools::Itertools;
    use proptest::prelude::*;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_floor_hour() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 10, 59, 59).unwrap()
            + TimeDelta::milliseconds(999);
        assert_eq!(floor_hour(timestamp), Some(at(1, 10)));
        assert_eq!(floor_hour(at(1, 10)), Some(at(1, 10)));
    }

    #[test]
    fn test_ceil_hour() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 23, 0, 0).unwrap()
            + TimeDelta::milliseconds(1);
        assert_eq!(ceil_hour(timestamp), Some(at(2, 0)));
        assert_eq!(ceil_hour(at(1, 10)), Some(at(1, 10)));
    }

    #[test]
    fn test_single_chunk_when_short() {
        let interval = Interval::new(at(1, 10), at(2, 10));
        let chunks = interval.chunks(TimeDelta::days(30)).collect_vec();
        assert_eq!(chunks, [interval]);
    }

    #[test]
    fn test_exact_span_is_single_chunk() {
        let interval = Interval::new(at(1, 0), at(2, 0));
        assert_eq!(interval.chunks(TimeDelta::days(1)).collect_vec(), [interval]);
    }

    #[test]
    fn test_last_chunk_is_shorter() {
        let chunks = Interval::new(at(1, 0), at(3, 12)).chunks(TimeDelta::days(1)).collect_vec();
        assert_eq!(
            chunks,
            [
                Interval::new(at(1, 0), at(2, 0)),
                Interval::new(at(2, 0), at(3, 0)),
                Interval::new(at(3, 0), at(3, 12)),
            ]
        );
    }

    #[test]
    fn test_empty_interval() {
        assert_eq!(Interval::new(at(2, 0), at(1, 0)).chunks(TimeDelta::days(1)).count(), 0);
        assert_eq!(Interval::new(at(1, 0), at(1, 0)).chunks(TimeDelta::days(1)).count(), 0);
    }

    #[test]
    fn test_non_positive_span() {
        let interval = Interval::new(at(1, 0), at(2, 0));
        assert_eq!(interval.chunks(TimeDelta::zero()).count(), 0);
        assert_eq!(interval.chunks(TimeDelta::hours(-1)).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let chunks = Interval::new(at(1, 0), at(5, 0)).chunks(TimeDelta::days(1));
        assert_eq!(chunks.clone().collect_vec(), chunks.collect_vec());
    }

    proptest! {
        #[test]
        fn chunks_cover_interval_exactly(
            start in 0_i64..10_000_000,
            length in 1_i64..31_536_000,
            max_span in 3_600_i64..2_592_000,
        ) {
            let start = DateTime::from_timestamp(1_700_000_000 + start, 0).unwrap();
            let interval = Interval::new(start, start + TimeDelta::seconds(length));
            let max_span = TimeDelta::seconds(max_span);
            let chunks = interval.chunks(max_span).collect_vec();

            prop_assert!(!chunks.is_empty());
            prop_assert_eq!(chunks[0].start, interval.start);
            prop_assert_eq!(chunks[chunks.len() - 1].end, interval.end);
            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(chunk.end - chunk.start <= max_span);
            }
            for (left, right) in chunks.iter().tuple_windows() {
                prop_assert_eq!(left.end, right.start);
            }
        }
    }
}
