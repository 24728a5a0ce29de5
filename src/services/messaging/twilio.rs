use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::MessagingProvider;
use crate::config::AppConfig;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioSmsProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

impl TwilioSmsProvider {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.twilio_account_sid.clone(),
            config.twilio_auth_token.clone(),
            config.twilio_phone_number.clone(),
        )
    }
}

#[async_trait]
impl MessagingProvider for TwilioSmsProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!("{API_BASE}/Accounts/{}/Messages.json", self.account_sid);

        let message: MessageResource = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .context("failed to reach Twilio")?
            .error_for_status()
            .context("Twilio rejected the message")?
            .json()
            .await
            .context("unexpected Twilio response")?;

        tracing::info!(
            to = %to,
            sid = %message.sid,
            status = message.status.as_deref().unwrap_or("unknown"),
            "SMS queued"
        );
        Ok(())
    }
}
