// discord_notifier.rs - Webhook notifications
// Purpose: push a one-line scan result to a Discord-compatible webhook.
// Delivery is advisory: errors and non-2xx responses are logged and dropped.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Alert sent when the vulnerability scan found something
pub fn vulns_found_message(target: &str, vuln_count: usize) -> String {
    format!(
        "🚨 **ApexRecon Alert:** Found {} vulnerabilities on {}!",
        vuln_count, target
    )
}

/// Confirmation sent when the vulnerability scan came back empty
pub fn clean_scan_message(target: &str) -> String {
    format!("✅ **ApexRecon:** Scan finished on {}. Clean (so far).", target)
}

/// Pick the template for a finished vulnerability stage
pub fn scan_result_message(target: &str, vuln_count: usize) -> String {
    if vuln_count > 0 {
        vulns_found_message(target, vuln_count)
    } else {
        clean_scan_message(target)
    }
}

#[async_trait]
pub trait Notify: Send + Sync {
    /// Fire-and-forget
    async fn notify(&self, message: &str);
}

/// Posts `{"content": message}` to the webhook. One client is shared by all targets.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, webhook_url }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notify for DiscordNotifier {
    async fn notify(&self, message: &str) {
        let Some(url) = self.webhook_url.as_deref() else {
            return;
        };

        let payload = json!({ "content": message });
        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!("webhook notification delivered");
            }
            Ok(resp) => {
                tracing::debug!(status = %resp.status(), "webhook rejected notification");
            }
            Err(e) => {
                tracing::debug!(error = %e, "webhook notification failed");
            }
        }
    }
}
