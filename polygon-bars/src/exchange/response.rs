//! Wire format of the Polygon.io aggregates endpoint

use crate::data::Bar;
use crate::Error;
use serde::Deserialize;

/// Body of a successful aggregates response
#[derive(Debug, Deserialize)]
pub struct AggregatesResponse {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "resultsCount", default)]
    pub results_count: Option<u64>,
    /// Absent when the range holds no bars
    #[serde(default)]
    pub results: Vec<AggregateBar>,
    /// Continuation link, not followed
    #[serde(default)]
    pub next_url: Option<String>,
}

/// One aggregate as sent by the service
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateBar {
    #[serde(rename = "t")]
    pub timestamp: i64,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    #[serde(rename = "vw", default)]
    pub vwap: Option<f64>,
    #[serde(rename = "n", default)]
    pub transactions: Option<i64>,
}

impl TryFrom<AggregateBar> for Bar {
    type Error = Error;

    fn try_from(agg: AggregateBar) -> Result<Self, Self::Error> {
        Ok(Bar {
            timestamp: agg.timestamp,
            open: agg.open,
            high: agg.high,
            low: agg.low,
            close: agg.close,
            volume: agg.volume,
            vwap: agg.vwap.ok_or_else(|| Error::MissingField("vwap".to_string()))?,
            transactions: agg
                .transactions
                .ok_or_else(|| Error::MissingField("transactions".to_string()))?,
        })
    }
}

/// Error body returned with a non-success status
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Best human readable message found in `body`, falling back to the raw text
    pub fn message_from(body: &str) -> String {
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
        parsed
            .error
            .or(parsed.message)
            .or(parsed.status)
            .unwrap_or_else(|| body.trim().to_string())
    }
}
