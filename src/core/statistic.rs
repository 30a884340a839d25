use chrono::{DateTime, Utc};
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

/// Hourly mean, min, and max of a rate series (for example, power).
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RatePoint {
    pub start: DateTime<Utc>,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Single increment of a cumulative series (for example, energy) together with the running total.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SumPoint {
    pub start: DateTime<Utc>,
    pub value: f64,
    pub running_sum: f64,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, derive_more::From)]
pub enum StatisticPoint {
    Rate(RatePoint),
    Sum(SumPoint),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MeanType {
    #[serde(rename = "none")]
    None,

    #[serde(rename = "arithmetic")]
    Arithmetic,
}

/// Statistic series descriptor, stored along with the rows.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticMetadata {
    pub statistic_id: String,
    pub name: String,
    pub source: String,
    pub unit_of_measurement: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_class: Option<String>,

    pub mean_type: MeanType,
    pub has_sum: bool,
}

/// Statistic row columns.
#[derive(Debug, Hash, enumset::EnumSetType)]
pub enum StatisticField {
    Mean,
    Min,
    Max,
    State,
    Sum,
}

/// Recorder row: every column is optional and the row is keyed by its start.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticData {
    pub start: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

impl StatisticData {
    const fn get(&self, field: StatisticField) -> Option<f64> {
        match field {
            StatisticField::Mean => self.mean,
            StatisticField::Min => self.min,
            StatisticField::Max => self.max,
            StatisticField::State => self.state,
            StatisticField::Sum => self.sum,
        }
    }

    #[must_use]
    pub fn has_all(&self, fields: EnumSet<StatisticField>) -> bool {
        fields.iter().all(|field| self.get(field).is_some())
    }

    /// Keep only the requested columns.
    pub fn project(self, fields: EnumSet<StatisticField>) -> Self {
        let keep = |field| if fields.contains(field) { self.get(field) } else { None };
        Self {
            start: self.start,
            mean: keep(StatisticField::Mean),
            min: keep(StatisticField::Min),
            max: keep(StatisticField::Max),
            state: keep(StatisticField::State),
            sum: keep(StatisticField::Sum),
        }
    }
}

impl From<StatisticPoint> for StatisticData {
    fn from(point: StatisticPoint) -> Self {
        match point {
            StatisticPoint::Rate(point) => Self {
                start: point.start,
                mean: Some(point.mean),
                min: Some(point.min),
                max: Some(point.max),
                state: Some(point.mean),
                sum: None,
            },
            StatisticPoint::Sum(point) => Self {
                start: point.start,
                state: Some(point.value),
                sum: Some(point.running_sum),
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_rate_point_into_data() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let data = StatisticData::from(StatisticPoint::from(RatePoint {
            start,
            mean: 25.0,
            min: 10.0,
            max: 40.0,
        }));
        assert_eq!(data.state, Some(25.0));
        assert_eq!(data.mean, Some(25.0));
        assert_eq!(data.sum, None);
        assert!(data.has_all(StatisticField::State | StatisticField::Max));
        assert!(!data.has_all(StatisticField::State | StatisticField::Sum));
    }

    #[test]
    fn test_project() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let data = StatisticData::from(StatisticPoint::from(SumPoint {
            start,
            value: 3.0,
            running_sum: 103.0,
        }))
        .project(EnumSet::only(StatisticField::Sum));
        assert_eq!(data, StatisticData { start, sum: Some(103.0), ..StatisticData::default() });
    }
}
