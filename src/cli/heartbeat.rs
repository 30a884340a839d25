use clap::Parser;
use reqwest::Url;

use crate::api::heartbeat::Heartbeat;

#[derive(Parser)]
pub struct HeartbeatArgs {
    /// URL to POST to after every successful cycle.
    #[clap(long = "heartbeat-url", env = "HEARTBEAT_URL")]
    url: Option<Url>,
}

impl HeartbeatArgs {
    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat::new(self.url.clone())
    }
}
