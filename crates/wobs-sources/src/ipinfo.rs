//! Current city of this machine from ipinfo.io

use anyhow::Result;
use reqwest::Client;
use wobs_core::NetworkLocator;

use crate::{fetch_json, trim_base, SourceError, SourceResult};

const PROVIDER: &str = "ipinfo";

pub struct IpInfoLocator {
    http: Client,
    base_url: String,
}

impl IpInfoLocator {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base(base_url),
        }
    }
}

pub fn parse_city(body: &serde_json::Value) -> SourceResult<String> {
    body.get("city")
        .and_then(|c| c.as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or(SourceError::MissingField {
            provider: PROVIDER,
            field: "city",
        })
}

#[async_trait::async_trait]
impl NetworkLocator for IpInfoLocator {
    async fn current_city(&self) -> Result<String> {
        let url = format!("{}/json", self.base_url);
        let body: serde_json::Value = fetch_json(PROVIDER, self.http.get(&url)).await?;
        Ok(parse_city(&body)?)
    }
}
