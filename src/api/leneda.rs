mod models;

use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use serde::Serialize;

use self::models::{AggregatedTimeSeries, Item, TimeSeries};
use crate::{
    core::{
        channel::Channel,
        fetcher::{FetchFailure, FetchMode, ReadingFetcher},
        interval::Interval,
        reading::Reading,
    },
    prelude::*,
};

pub const DEFAULT_BASE_URL: &str = "https://api.leneda.eu/api";

/// Leneda metering data API.
pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn new(api_key: &str, energy_id: &str, base_url: Url) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be used as a base URL");
        let mut api_key = HeaderValue::from_str(api_key).context("invalid API key")?;
        api_key.set_sensitive(true);
        let headers = HeaderMap::from_iter([
            (HeaderName::from_static("x-api-key"), api_key),
            (
                HeaderName::from_static("x-energy-id"),
                HeaderValue::from_str(energy_id).context("invalid energy ID")?,
            ),
        ]);
        let client = Client::builder()
            .user_agent("leneda-importer")
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Build the request URL of the chunk.
    ///
    /// Raw readings are requested by the exact timestamps,
    /// while aggregated ones only accept the dates.
    fn build_url(&self, channel: &Channel, chunk: Interval, mode: FetchMode) -> Result<Url> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RawQuery<'a> {
            start_date_time: String,
            end_date_time: String,
            obis_code: &'a str,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct AggregatedQuery<'a> {
            start_date: String,
            end_date: String,
            obis_code: &'a str,
            aggregation_level: &'static str,
            transformation_mode: &'static str,
        }

        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut().map_err(|()| anyhow!("invalid base URL"))?;
            segments.pop_if_empty().push("metering-points").push(&channel.metering_point);
            segments.push("time-series");
            if mode == FetchMode::HourlyAccumulation {
                segments.push("aggregated");
            }
        }
        let query = match mode {
            FetchMode::Raw => serde_qs::to_string(&RawQuery {
                start_date_time: chunk.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                end_date_time: chunk.end.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                obis_code: &channel.obis_code,
            }),
            FetchMode::HourlyAccumulation => serde_qs::to_string(&AggregatedQuery {
                start_date: chunk.start.format("%Y-%m-%d").to_string(),
                end_date: chunk.end.format("%Y-%m-%d").to_string(),
                obis_code: &channel.obis_code,
                aggregation_level: "Hour",
                transformation_mode: "Accumulation",
            }),
        }
        .context("failed to serialize the query")?;
        url.set_query(Some(&query));
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<Vec<u8>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("failed to send the request")?
            .error_for_status()?
            .bytes()
            .await
            .context("failed to read the response")?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl ReadingFetcher for Api {
    #[instrument(skip_all, fields(channel = %channel, chunk = ?chunk, mode = ?mode))]
    async fn fetch(
        &self,
        channel: &Channel,
        chunk: Interval,
        mode: FetchMode,
    ) -> Result<Vec<Reading>, FetchFailure> {
        let url = self.build_url(channel, chunk, mode).map_err(FetchFailure::Transport)?;
        let body = self.get_body(url).await.map_err(FetchFailure::Transport)?;
        let items = match mode {
            FetchMode::Raw => serde_json::from_slice::<TimeSeries>(&body).map(|body| body.items),
            FetchMode::HourlyAccumulation => {
                serde_json::from_slice::<AggregatedTimeSeries>(&body).map(|body| body.items)
            }
        }
        .context("failed to deserialize the time series")
        .map_err(FetchFailure::Malformed)?;
        debug!(n_items = items.len(), "fetched");
        Ok(Item::into_readings(items))
    }
}
