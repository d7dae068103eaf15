//! Digest building and webhook delivery

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::slots::SlotRecord;

/// Matching slots per center, in the order the centers are configured
pub type RunResult = Vec<(String, Vec<SlotRecord>)>;

/// Render the digest posted to the webhook.
///
/// One block per center: a separator, the center name in bold markdown, then
/// a line per slot with the start and end times exactly as received.
pub fn build_digest(results: &RunResult) -> String {
    let mut lines = Vec::new();
    for (center, slots) in results {
        lines.push("---".to_string());
        lines.push(format!("**{center}**"));
        for slot in slots {
            lines.push(format!("- {} → {}", slot.from, slot.till));
        }
    }
    lines.join("\n")
}

/// Outbound message delivery
#[async_trait]
pub trait Webhook: Send + Sync {
    /// Deliver one message. Best-effort: the caller logs failures and moves
    /// on, a lost notification never fails the run.
    async fn post(&self, content: &str) -> Result<()>;
}

/// Webhook client posting Discord-style `{"content": ...}` payloads
pub struct WebhookClient {
    http: HttpClient,
    url: String,
}

impl WebhookClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl Webhook for WebhookClient {
    async fn post(&self, content: &str) -> Result<()> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::WebhookStatus(status.as_u16()).into());
        }

        log::debug!("Webhook accepted the digest with status {status}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(from: &str, till: &str) -> SlotRecord {
        SlotRecord {
            from: from.to_string(),
            till: till.to_string(),
        }
    }

    #[test]
    fn test_digest_single_center() {
        let results = vec![(
            "Brakel".to_string(),
            vec![slot("2025-02-21T10:00:00", "2025-02-21T11:00:00")],
        )];

        assert_eq!(
            build_digest(&results),
            "---\n**Brakel**\n- 2025-02-21T10:00:00 → 2025-02-21T11:00:00"
        );
    }

    #[test]
    fn test_digest_keeps_center_order() {
        let results = vec![
            (
                "Eeklo".to_string(),
                vec![slot("2025-02-22T09:00:00", "2025-02-22T10:00:00")],
            ),
            (
                "Brakel".to_string(),
                vec![
                    slot("2025-02-21T10:00:00", "2025-02-21T11:00:00"),
                    slot("2025-02-21T13:00:00", "2025-02-21T14:00:00"),
                ],
            ),
        ];

        let digest = build_digest(&results);
        let eeklo = digest.find("**Eeklo**").unwrap();
        let brakel = digest.find("**Brakel**").unwrap();
        assert!(eeklo < brakel);
        assert_eq!(digest.matches("---").count(), 2);
        assert_eq!(digest.lines().count(), 7);
    }

    #[test]
    fn test_digest_reports_times_verbatim() {
        // Whatever text form the API used is what the operator sees
        let results = vec![("Eeklo".to_string(), vec![slot("2025-02-21T10:00", "later")])];
        assert!(build_digest(&results).contains("- 2025-02-21T10:00 → later"));
    }

    #[tokio::test]
    async fn test_post_sends_content_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_body(mockito::Matcher::Json(json!({ "content": "open slots!" })))
            .with_status(204)
            .create_async()
            .await;

        let config = Config::with_account(
            "user@example.com".to_string(),
            "hunter2".to_string(),
            format!("{}/hook", server.url()),
        );

        let webhook = WebhookClient::new(&config).unwrap();
        webhook.post("open slots!").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_bad_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/hook")
            .with_status(429)
            .create_async()
            .await;

        let config = Config::with_account(
            "user@example.com".to_string(),
            "hunter2".to_string(),
            format!("{}/hook", server.url()),
        );

        let webhook = WebhookClient::new(&config).unwrap();
        let err = webhook.post("hello").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
