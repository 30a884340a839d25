use clap::Parser;
use reqwest::Url;

use crate::{
    api::leneda::{self, DEFAULT_BASE_URL},
    core::{channel::Channel, obis::ObisCode},
    prelude::*,
};

#[derive(Parser)]
pub struct ChannelArgs {
    /// Metering point code, for example: `LU0000010637000000000000070232342`.
    #[clap(long = "metering-point", env = "LENEDA_METERING_POINT")]
    pub metering_point: String,

    /// OBIS code of the measurement.
    #[clap(long = "obis-code", env = "LENEDA_OBIS_CODE", default_value = ObisCode::DEFAULT)]
    pub obis_code: String,
}

impl ChannelArgs {
    pub fn channel(&self) -> Channel {
        Channel::new(&self.metering_point, &self.obis_code)
    }
}

#[derive(Parser)]
pub struct LenedaArgs {
    #[clap(long = "leneda-api-key", env = "LENEDA_API_KEY", hide_env_values = true)]
    api_key: String,

    #[clap(long = "leneda-energy-id", env = "LENEDA_ENERGY_ID")]
    energy_id: String,

    #[clap(
        long = "leneda-api-base-url",
        env = "LENEDA_API_BASE_URL",
        default_value = DEFAULT_BASE_URL
    )]
    base_url: Url,

    #[clap(flatten)]
    pub channel: ChannelArgs,
}

impl LenedaArgs {
    pub fn new_client(&self) -> Result<leneda::Api> {
        leneda::Api::new(&self.api_key, &self.energy_id, self.base_url.clone())
    }
}
