use async_trait::async_trait;

use super::MessagingProvider;

/// Logs outgoing messages instead of delivering them.
pub struct DryRunMessaging;

#[async_trait]
impl MessagingProvider for DryRunMessaging {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(to = %to, body = %body, "[dry run] would send SMS");
        Ok(())
    }
}
