//! Rate Quote Service client.
//!
//! Yields the multiplicative factor from the ledger's base unit to a display
//! currency. Conversion is a read-time transform applied to final aggregates
//! only; stored amounts are never converted.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub enum RateError {
    UnknownCurrency(String),
    Timeout(String),
    Upstream(String),
}

/// `latest.json` answer of an openexchangerates-style service.
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

#[derive(Clone, Debug)]
pub enum RateClient {
    /// Live quote endpoint.
    Http {
        http: reqwest::Client,
        url: String,
        app_id: String,
    },
    /// Fixed factors for tests and local development.
    Fixed(HashMap<String, f64>),
}

impl RateClient {
    pub fn http(url: &str, app_id: &str, timeout: Duration) -> Result<Self, RateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RateError::Upstream(err.to_string()))?;
        Ok(Self::Http {
            http,
            url: url.to_string(),
            app_id: app_id.to_string(),
        })
    }

    pub fn fixed(rates: HashMap<String, f64>) -> Self {
        Self::Fixed(rates)
    }

    /// Factor that converts a base-unit amount into `currency`.
    pub async fn rate_for(&self, currency: &str) -> Result<f64, RateError> {
        let code = currency.trim().to_ascii_uppercase();
        match self {
            Self::Http { http, url, app_id } => {
                let res = http
                    .get(url)
                    .query(&[("app_id", app_id.as_str())])
                    .send()
                    .await
                    .map_err(classify_transport)?;
                if !res.status().is_success() {
                    return Err(RateError::Upstream(format!(
                        "rate service answered {}",
                        res.status()
                    )));
                }
                let latest: LatestRates = res.json().await.map_err(classify_transport)?;
                latest
                    .rates
                    .get(&code)
                    .copied()
                    .ok_or(RateError::UnknownCurrency(code))
            }
            Self::Fixed(rates) => rates
                .get(&code)
                .copied()
                .ok_or(RateError::UnknownCurrency(code)),
        }
    }
}

fn classify_transport(err: reqwest::Error) -> RateError {
    if err.is_timeout() {
        RateError::Timeout("rate service timed out".to_string())
    } else {
        RateError::Upstream(err.to_string())
    }
}
