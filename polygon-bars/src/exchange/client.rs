//! Polygon.io REST client

use crate::data::Bar;
use crate::exchange::query::AggregatesQuery;
use crate::exchange::response::{AggregatesResponse, ErrorResponse};
use crate::{Error, Result};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

/// Base URL of the Polygon.io REST API
const POLYGON_API_URL: &str = "https://api.polygon.io";

/// Blocking client for the aggregates endpoint
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PolygonClient {
    /// Create a client against the public API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, POLYGON_API_URL)
    }

    /// Create a client against another host, e.g. a proxy or a test server
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self::with_http_client(api_key, base_url, Client::new())
    }

    /// Create a client reusing a configured HTTP client
    pub fn with_http_client(api_key: impl Into<String>, base_url: &str, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint path for `query`; the API key travels as a query parameter
    pub fn aggs_url(&self, query: &AggregatesQuery) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.base_url,
            query.ticker,
            query.multiplier,
            query.timespan,
            query.from.format("%Y-%m-%d"),
            query.to.format("%Y-%m-%d"),
        )
    }

    /// Fetch the bars the service reports for `query` in one request.
    ///
    /// Transport, authentication and quota failures are returned as is;
    /// nothing is retried and `next_url` pages are not followed.
    pub fn get_aggs(&self, query: &AggregatesQuery) -> Result<Vec<Bar>> {
        let url = self.aggs_url(query);
        let limit = query.limit.to_string();

        info!(
            "Fetching {} x {} bars for {} from {} to {}",
            query.multiplier, query.timespan, query.ticker, query.from, query.to
        );
        debug!("GET {}?adjusted=true&sort=asc&limit={}", url, limit);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: ErrorResponse::message_from(&body),
            });
        }

        let aggs: AggregatesResponse = serde_json::from_str(&body)?;
        if aggs.next_url.is_some() {
            warn!("Response for {} has more pages; only the first is used", query.ticker);
        }

        let bars = aggs
            .results
            .into_iter()
            .map(Bar::try_from)
            .collect::<Result<Vec<_>>>()?;

        info!("Received {} bars for {}", bars.len(), query.ticker);
        Ok(bars)
    }
}
