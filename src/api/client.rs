use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    api::transport::{Transport, WireRequest, WireResponse},
    prelude::*,
};

/// [`Transport`] over HTTPS.
pub struct HttpTransport(Client);

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, level = Level::DEBUG, fields(url = %request.url))]
    async fn send(&self, request: WireRequest) -> Result<WireResponse> {
        let response = self
            .0
            .get(request.url)
            .headers(request.headers)
            .send()
            .await
            .context("failed to send the request")?;
        let status = response.status();
        let body = response.text().await.context("failed to read the response body")?;
        debug!(%status, len = body.len(), "received");
        Ok(WireResponse::new(status, body))
    }
}
