//! HTTP dispatch of a finished parameter set.

use std::time::Instant;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::{
    endpoint::{Endpoint, EndpointConfig},
    error::{Result, TransportError},
    response::SearchResponse,
};

/// Sends one GET request per search to the resolved endpoint.
///
/// Timeouts and connection pooling come from the wrapped [`Client`]; this
/// type never retries.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    /// Resolve `config` and build a transport with a default client.
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        Ok(Self::with_client(Client::new(), config.resolve()?))
    }

    pub fn with_client(client: Client, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send the parameters and parse the response payload.
    #[instrument(name = "Search request", level = "debug", skip_all, fields(endpoint = %self.endpoint))]
    pub async fn send<I, K, V>(&self, params: I) -> Result<SearchResponse>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = self.endpoint.request_url(params)?;
        debug!(url = %url, "Dispatching search request");
        let t_request = Instant::now();

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Search backend rejected the request");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = SearchResponse::from_json(&body)?;
        info!(
            found = parsed.hits.found,
            elapsed = ?t_request.elapsed(),
            "Search request complete"
        );
        Ok(parsed)
    }
}
