use std::time::Duration;

use reqwest::{Client, Url};

use crate::prelude::*;

/// Optional liveness ping, sent after each cycle.
#[derive(Clone)]
pub struct Heartbeat(Option<Url>);

impl Heartbeat {
    pub const fn new(url: Option<Url>) -> Self {
        Self(url)
    }

    /// Send the heartbeat, if configured. Failures are only logged.
    pub async fn send(&self) {
        if let Some(url) = &self.0
            && let Err(error) = Self::send_fallible(url.clone()).await
        {
            warn!("failed to send the heartbeat: {error:#}");
        }
    }

    #[instrument(skip_all)]
    async fn send_fallible(url: Url) -> Result {
        info!("sending a heartbeat…");
        Client::builder()
            .timeout(Duration::from_secs(3))
            .build()?
            .post(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
