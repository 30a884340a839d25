mod accumulate;
mod aggregate;

use enumset::EnumSet;

pub use self::{accumulate::Accumulate, aggregate::AggregateHourly};
use crate::{
    core::{
        channel::Channel,
        fetcher::FetchMode,
        obis::ObisCode,
        statistic::{MeanType, StatisticField, StatisticMetadata},
    },
    prelude::*,
};

#[derive(Debug, clap::ValueEnum, enumset::EnumSetType)]
pub enum SeriesKind {
    /// Hourly mean, min, and max of the 15-minute samples.
    Power,

    /// Running sum of the hourly accumulated values.
    Energy,
}

impl SeriesKind {
    #[must_use]
    pub const fn fetch_mode(self) -> FetchMode {
        match self {
            Self::Power => FetchMode::Raw,
            Self::Energy => FetchMode::HourlyAccumulation,
        }
    }

    /// Columns stored for the series of this kind.
    #[must_use]
    pub fn statistic_fields(self) -> EnumSet<StatisticField> {
        match self {
            Self::Power => {
                StatisticField::Mean | StatisticField::Min | StatisticField::Max | StatisticField::State
            }
            Self::Energy => StatisticField::State | StatisticField::Sum,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Power => "Power Demand",
            Self::Energy => "Energy Consumption",
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Power => "pwr_15min",
            Self::Energy => "energy_hourly",
        }
    }
}

/// Everything a cycle needs to know about the series it imports.
#[must_use]
#[derive(Clone, Debug)]
pub struct Series {
    pub kind: SeriesKind,
    pub channel: Channel,
    pub metadata: StatisticMetadata,
}

impl Series {
    pub fn try_new(kind: SeriesKind, channel: Channel) -> Result<Self> {
        let obis_code = ObisCode::lookup(&channel.obis_code)?;
        debug!(obis_code.code, obis_code.description, ?kind, "building the series");
        let (unit, unit_class, mean_type) = match kind {
            SeriesKind::Power => {
                (obis_code.rate_unit, obis_code.rate_unit_class, MeanType::Arithmetic)
            }
            SeriesKind::Energy => {
                (obis_code.cumulative_unit, obis_code.cumulative_unit_class, MeanType::None)
            }
        };
        let metadata = StatisticMetadata {
            statistic_id: channel.statistic_id(kind.suffix()),
            name: kind.name().to_string(),
            source: "recorder".to_string(),
            unit_of_measurement: unit.to_string(),
            unit_class: unit_class.map(ToString::to_string),
            mean_type,
            has_sum: kind == SeriesKind::Energy,
        };
        Ok(Self { kind, channel, metadata })
    }

    #[must_use]
    pub fn statistic_id(&self) -> &str {
        &self.metadata.statistic_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_series() -> Result {
        let series = Series::try_new(SeriesKind::Power, Channel::new("LU01", "1-1:1.29.0"))?;
        assert_eq!(series.statistic_id(), "sensor.lu01_1_1_1_29_0_pwr_15min");
        assert_eq!(series.metadata.unit_of_measurement, "kW");
        assert_eq!(series.metadata.mean_type, MeanType::Arithmetic);
        assert!(!series.metadata.has_sum);
        Ok(())
    }

    #[test]
    fn test_energy_series() -> Result {
        let series = Series::try_new(SeriesKind::Energy, Channel::new("LU01", "1-1:2.29.0"))?;
        assert_eq!(series.statistic_id(), "sensor.lu01_1_1_2_29_0_energy_hourly");
        assert_eq!(series.metadata.unit_of_measurement, "kWh");
        assert_eq!(series.metadata.unit_class.as_deref(), Some("energy"));
        assert_eq!(series.metadata.mean_type, MeanType::None);
        assert!(series.metadata.has_sum);
        Ok(())
    }

    #[test]
    fn test_statistic_fields_match_conversion() {
        use chrono::Utc;

        use crate::core::statistic::{RatePoint, StatisticData, StatisticPoint, SumPoint};

        let start = Utc::now();
        let rate = StatisticData::from(StatisticPoint::from(RatePoint {
            start,
            mean: 1.0,
            min: 0.0,
            max: 2.0,
        }));
        assert!(rate.has_all(SeriesKind::Power.statistic_fields()));
        assert_eq!(rate.sum, None);
        let sum = StatisticData::from(StatisticPoint::from(SumPoint {
            start,
            value: 1.0,
            running_sum: 3.0,
        }));
        assert!(sum.has_all(SeriesKind::Energy.statistic_fields()));
        assert_eq!(sum.mean, None);
    }

    #[test]
    fn test_unknown_obis_code() {
        assert!(Series::try_new(SeriesKind::Power, Channel::new("LU01", "0-0:0.0.0")).is_err());
    }
}
