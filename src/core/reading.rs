use chrono::{DateTime, NaiveDateTime, Utc};

/// Single raw sample as returned by the metering API.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, derive_more::Constructor)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    /// Parse an ISO-8601 timestamp.
    ///
    /// Timestamps without an offset are assumed to be in UTC.
    #[must_use]
    pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(timestamp)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|timestamp| timestamp.and_utc())
            })
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_zulu() {
        assert_eq!(
            Reading::parse_timestamp("2025-03-01T10:15:00Z"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 0).unwrap()),
        );
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(
            Reading::parse_timestamp("2025-03-01T11:15:00+01:00"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 0).unwrap()),
        );
    }

    #[test]
    fn test_parse_naive_as_utc() {
        assert_eq!(
            Reading::parse_timestamp("2025-03-01T10:15:00.000"),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 0).unwrap()),
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(Reading::parse_timestamp("yesterday"), None);
        assert_eq!(Reading::parse_timestamp(""), None);
    }
}
