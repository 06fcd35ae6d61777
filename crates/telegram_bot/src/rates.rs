//! Client of the external exchange-rate service.

use std::time::Duration;

use api_types::rate::RateResponse;
use engine::Currency;
use reqwest::{Client, StatusCode};

#[derive(Debug, thiserror::Error)]
pub(crate) enum RateError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rate service answered {0}")]
    Status(StatusCode),
    #[error("malformed rate response: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug)]
pub(crate) struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    /// Every request is bounded by `timeout`, connection included.
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Base-currency units per one unit of `currency`, as quoted by the service.
    pub(crate) async fn fetch_rate(&self, currency: Currency) -> Result<f64, RateError> {
        let resp = self
            .client
            .get(self.url("rate"))
            .query(&[("currency", currency.code())])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(RateError::Status(status));
        }

        let body = resp.bytes().await?;
        let parsed: RateResponse =
            serde_json::from_slice(&body).map_err(|err| RateError::Malformed(err.to_string()))?;

        if !parsed.rate.is_finite() || parsed.rate <= 0.0 {
            return Err(RateError::Malformed(format!("unusable rate {}", parsed.rate)));
        }
        Ok(parsed.rate)
    }

    /// Rate for converting base amounts into `currency`.
    ///
    /// The base currency never hits the network. Any failure is logged and
    /// reported as `None` so callers can fall back to the base currency.
    pub(crate) async fn convert_rate(&self, currency: Currency) -> Option<f64> {
        if currency.is_base() {
            return Some(1.0);
        }

        match self.fetch_rate(currency).await {
            Ok(rate) => Some(rate),
            Err(err) => {
                tracing::warn!("rate for {currency} unavailable: {err}");
                None
            }
        }
    }
}
