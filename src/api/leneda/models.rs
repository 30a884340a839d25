use serde::Deserialize;
use serde_with::serde_as;

use crate::{core::reading::Reading, prelude::*};

/// Response of the `time-series` endpoint.
#[must_use]
#[serde_as]
#[derive(Deserialize)]
pub struct TimeSeries {
    #[serde_as(as = "Vec<serde_with::DefaultOnError>")]
    pub items: Vec<Option<Item>>,
}

/// Response of the `time-series/aggregated` endpoint.
#[must_use]
#[serde_as]
#[derive(Deserialize)]
pub struct AggregatedTimeSeries {
    #[serde(rename = "aggregatedTimeSeries")]
    #[serde_as(as = "Vec<serde_with::DefaultOnError>")]
    pub items: Vec<Option<Item>>,
}

/// Time series item, `None` when the entry is not an object or its value is not a number.
#[must_use]
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct Item {
    #[serde(rename = "startedAt")]
    pub started_at: Option<String>,

    #[serde_as(as = "Option<serde_with::PickFirst<(_, serde_with::DisplayFromStr)>>")]
    pub value: Option<f64>,
}

impl Item {
    /// Convert the items into readings.
    ///
    /// Every item that cannot become a reading is dropped and counted in a single warning.
    pub fn into_readings(items: Vec<Option<Self>>) -> Vec<Reading> {
        let n_items = items.len();
        let readings: Vec<_> = items
            .into_iter()
            .filter_map(|item| {
                let reading = item.as_ref().and_then(Self::to_reading);
                if reading.is_none() {
                    debug!(?item, "dropped the item");
                }
                reading
            })
            .collect();
        if readings.len() != n_items {
            warn!(n_dropped = n_items - readings.len(), n_items, "dropped unparseable readings");
        }
        readings
    }

    fn to_reading(&self) -> Option<Reading> {
        let timestamp = Reading::parse_timestamp(self.started_at.as_deref()?)?;
        Some(Reading::new(timestamp, self.value?))
    }
}
