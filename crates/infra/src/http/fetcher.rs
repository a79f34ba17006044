//! HTTP implementation of the calendar fetcher port

use async_trait::async_trait;
use campuscal_core::CalendarFetcher;
use campuscal_domain::{CampusCalError, Result, ScrapeConfig};
use reqwest::Method;
use tracing::{instrument, warn};
use url::Url;

use super::client::HttpClient;
use crate::errors::conversions::status_message;
use crate::errors::InfraError;

/// GETs calendar sources over HTTP; any non-2xx status is a network failure
#[derive(Clone, Debug)]
pub struct HttpCalendarFetcher {
    client: HttpClient,
}

impl HttpCalendarFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_config(config)?))
    }
}

#[async_trait]
impl CalendarFetcher for HttpCalendarFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.client.send(self.client.request(Method::GET, url.clone())).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Calendar source returned non-success status");
            return Err(CampusCalError::Network(status_message(status)));
        }

        let body = response.bytes().await.map_err(|err| CampusCalError::from(InfraError::from(err)))?;
        Ok(body.to_vec())
    }
}
