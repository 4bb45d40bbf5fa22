//! Match notification delivery through an HTTP mail relay.
//!
//! The relay owns SMTP; this client renders both messages and POSTs each
//! to `{relay}/send`. Delivery is strictly best-effort: failures are
//! logged and reported as `false`, never raised, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use foundry_core::{defaults, Item, Mailer};

use crate::templates::{found_party_notification, lost_party_notification, MailMessage};

/// Default mail relay endpoint.
pub const DEFAULT_MAIL_RELAY_URL: &str = defaults::MAIL_RELAY_URL;

#[derive(Debug, Serialize)]
struct SendWireRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Mail relay client.
pub struct MailRelayClient {
    client: Client,
    base_url: String,
    from: String,
}

impl MailRelayClient {
    /// Create a new client with a custom relay URL and sender address.
    pub fn with_config(base_url: String, from: String) -> Self {
        let timeout = std::env::var("MAIL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::MAIL_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "notify",
            component = "mail_relay",
            base_url = %base_url,
            from = %from,
            "Initializing mail relay client"
        );

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            from,
        }
    }

    /// Create from `MAIL_RELAY_URL` / `MAIL_FROM` environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("MAIL_RELAY_URL")
            .unwrap_or_else(|_| DEFAULT_MAIL_RELAY_URL.to_string());
        let from = std::env::var("MAIL_FROM").unwrap_or_else(|_| defaults::MAIL_FROM.to_string());
        Self::with_config(base_url, from)
    }

    /// Deliver one rendered message. Returns whether the relay accepted
    /// it.
    async fn deliver(&self, message: &MailMessage) -> bool {
        if message.to.trim().is_empty() {
            warn!(
                subsystem = "notify",
                component = "mail_relay",
                op = "send",
                subject = %message.subject,
                "Skipping notification with no recipient"
            );
            return false;
        }

        let payload = SendWireRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let result = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(_) => {
                info!(
                    subsystem = "notify",
                    component = "mail_relay",
                    op = "send",
                    to = %message.to,
                    "Notification delivered"
                );
                true
            }
            Err(e) => {
                warn!(
                    subsystem = "notify",
                    component = "mail_relay",
                    op = "send",
                    to = %message.to,
                    error = %e,
                    "Notification delivery failed"
                );
                false
            }
        }
    }
}

#[async_trait]
impl Mailer for MailRelayClient {
    async fn send_match_notification(&self, lost: &Item, found: &Item, score: f32) -> bool {
        let to_lost = lost_party_notification(lost, found, score);
        let to_found = found_party_notification(lost, found, score);

        // Both parties are told; one failed delivery does not stop the
        // other, but any failure makes the whole notification false.
        let lost_ok = self.deliver(&to_lost).await;
        let found_ok = self.deliver(&to_found).await;

        lost_ok && found_ok
    }
}
