//! Provider adapters
//!
//! HTTP implementations of the collaborator traits in `wobs-core`, plus the
//! target selectors. Every adapter is a thin request/parse pair; parsing is
//! split out into pure functions so it can be tested without a network.

pub mod clock;
pub mod elevation;
pub mod geocoding;
pub mod geomagnetic;
pub mod ipinfo;
pub mod marine;
pub mod targets;
pub mod weatherbit;

pub use clock::*;
pub use elevation::*;
pub use geocoding::*;
pub use geomagnetic::*;
pub use ipinfo::*;
pub use marine::*;
pub use targets::*;
pub use weatherbit::*;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} responded with status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{provider} has no result for `{query}`")]
    NotFound {
        provider: &'static str,
        query: String,
    },

    #[error("{provider} response has no usable `{field}`")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Base URLs of every provider
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub geocoding: String,
    pub weatherbit: String,
    pub elevation: String,
    pub marine: String,
    pub geomagnetic: String,
    pub clock: String,
    pub ipinfo: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: "https://geocoding-api.open-meteo.com".into(),
            weatherbit: "https://api.weatherbit.io".into(),
            elevation: "https://api.open-elevation.com".into(),
            marine: "https://marine-api.open-meteo.com".into(),
            geomagnetic: "https://services.swpc.noaa.gov".into(),
            clock: "https://worldtimeapi.org".into(),
            ipinfo: "https://ipinfo.io".into(),
        }
    }
}

/// Shared HTTP client for all providers
pub fn build_client() -> SourceResult<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(20))
        .user_agent(concat!("weather-observer/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send a request and decode a JSON body, mapping non-2xx to [`SourceError::Status`].
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> SourceResult<T> {
    let response = request.send().await?;
    let status = response.status();
    debug!(provider, status = status.as_u16(), "provider responded");
    if !status.is_success() {
        return Err(SourceError::Status {
            provider,
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Parse(format!("{}: {}", provider, e)))
}

pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
