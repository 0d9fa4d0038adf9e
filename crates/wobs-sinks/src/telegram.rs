//! Telegram Bot API delivery

use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};
use wobs_core::{ReportStyle, Sink};

use crate::SinkError;

pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Bot token and destination chat. Either may be absent; the sink then
/// refuses every delivery instead of failing at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelegramCredentials {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramCredentials {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: Some(bot_token.into()),
            chat_id: Some(chat_id.into()),
        }
    }

    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v: &String| !v.is_empty());
        Self {
            bot_token: var(BOT_TOKEN_VAR),
            chat_id: var(CHAT_ID_VAR),
        }
    }

    fn require(&self) -> Result<(&str, &str), SinkError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or(SinkError::MissingCredential(BOT_TOKEN_VAR))?;
        let chat = self
            .chat_id
            .as_deref()
            .ok_or(SinkError::MissingCredential(CHAT_ID_VAR))?;
        Ok((token, chat))
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramSink {
    client: Client,
    base_url: String,
    credentials: TelegramCredentials,
}

impl TelegramSink {
    pub fn new(client: Client, base_url: &str, credentials: TelegramCredentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

#[async_trait::async_trait]
impl Sink for TelegramSink {
    fn name(&self) -> &str {
        "telegram"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::Message
    }

    async fn deliver(&mut self, report: &str) -> Result<()> {
        let (token, chat_id) = self.credentials.require()?;
        let url = format!("{}/bot{}/sendMessage", self.base_url, token);
        let resp = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id,
                text: report,
            })
            .send()
            .await
            .map_err(SinkError::from)?;

        let status = resp.status();
        let reason = status.canonical_reason().unwrap_or("Unknown");
        if status.is_success() {
            info!("Sent: {}. Status code: {}", reason, status.as_u16());
            Ok(())
        } else {
            error!("Not sent: {}. Status code: {}", reason, status.as_u16());
            Err(SinkError::Rejected {
                status: status.as_u16(),
                reason: reason.to_string(),
            }
            .into())
        }
    }
}
