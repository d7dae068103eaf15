//! SBAT API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde_json::json;

use super::ExamApi;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::slots::SlotRecord;

/// The booking frontend rejects unfamiliar clients, so we present the same
/// headers a browser session would.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:135.0) Gecko/20100101 Firefox/135.0";
const SITE_ORIGIN: &str = "https://rijbewijs.sbat.be";

/// SBAT practical-exam API client
pub struct SbatClient {
    http: HttpClient,
    auth_url: String,
    availability_url: String,
    username: String,
    password: String,
    license_type: String,
    exam_type: String,
}

impl SbatClient {
    /// Create a client from the configured endpoints and account
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            auth_url: config.auth_url.clone(),
            availability_url: config.availability_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            license_type: config.license_type.clone(),
            exam_type: config.exam_type.clone(),
        })
    }

    fn browser_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("User-Agent", USER_AGENT)
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Origin", SITE_ORIGIN)
            .header("Referer", format!("{SITE_ORIGIN}/"))
    }
}

#[async_trait]
impl ExamApi for SbatClient {
    async fn authenticate(&self) -> Result<String> {
        log::debug!("POST {}", self.auth_url);

        let response = self
            .browser_headers(self.http.post(&self.auth_url))
            .json(&json!({
                "username": self.username,
                "password": self.password,
            }))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::AuthFailed(status.as_u16(), body).into());
        }

        // The response body IS the token, no envelope around it
        let token = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read auth response: {e}")))?;
        let token = token.trim();

        if token.is_empty() {
            return Err(ApiError::InvalidResponse("empty token in auth response".to_string()).into());
        }

        Ok(token.to_string())
    }

    async fn available_slots(
        &self,
        token: &str,
        center_id: u32,
        start_date: &str,
    ) -> Vec<SlotRecord> {
        let body = json!({
            "examCenterId": center_id,
            "licenseType": self.license_type,
            "examType": self.exam_type,
            "startDate": start_date,
        });

        let result = self
            .browser_headers(self.http.post(&self.availability_url))
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .send()
            .await;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Center {center_id}: availability request failed: {e}");
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("Center {center_id}: availability endpoint returned {status}");
            return Vec::new();
        }

        match response.json::<Vec<SlotRecord>>().await {
            Ok(slots) => {
                log::debug!("Center {center_id}: {} open slots", slots.len());
                slots
            }
            Err(e) => {
                log::warn!("Center {center_id}: could not decode availability response: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config(server_url: &str) -> Config {
        let mut config = Config::with_account(
            "user@example.com".to_string(),
            "hunter2".to_string(),
            format!("{server_url}/hook"),
        );
        config.auth_url = format!("{server_url}/user/authenticate");
        config.availability_url = format!("{server_url}/exam/available");
        config
    }

    #[tokio::test]
    async fn test_authenticate_returns_trimmed_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/user/authenticate")
            .match_body(mockito::Matcher::PartialJson(json!({
                "username": "user@example.com",
                "password": "hunter2",
            })))
            .with_status(200)
            .with_body("  header.payload.sig \n")
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        let token = client.authenticate().await.unwrap();

        assert_eq!(token, "header.payload.sig");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_bad_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/user/authenticate")
            .with_status(401)
            .with_body("nope")
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        let err = client.authenticate().await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_authenticate_empty_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/user/authenticate")
            .with_status(200)
            .with_body("   ")
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        assert!(client.authenticate().await.is_err());
    }

    #[tokio::test]
    async fn test_available_slots_parses_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/exam/available")
            .match_header("authorization", "Bearer tok-123")
            .match_body(mockito::Matcher::PartialJson(json!({
                "examCenterId": 7,
                "licenseType": "B",
                "examType": "E2",
                "startDate": "2025-02-18T09:30",
            })))
            .with_status(200)
            .with_body(r#"[{"from":"2025-02-21T10:00:00","till":"2025-02-21T11:00:00"}]"#)
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        let slots = client.available_slots("tok-123", 7, "2025-02-18T09:30").await;

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].from, "2025-02-21T10:00:00");
        assert_eq!(slots[0].till, "2025-02-21T11:00:00");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_available_slots_bad_status_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/exam/available")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        let slots = client.available_slots("tok", 1, "2025-02-18T09:30").await;
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_available_slots_undecodable_body_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/exam/available")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = SbatClient::new(&test_config(&server.url())).unwrap();
        let slots = client.available_slots("tok", 1, "2025-02-18T09:30").await;
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_available_slots_unreachable_server_yields_empty() {
        let mut config = test_config("http://127.0.0.1:9");
        config.availability_url = "http://127.0.0.1:9/exam/available".to_string();

        let client = SbatClient::new(&config).unwrap();
        let slots = client.available_slots("tok", 1, "2025-02-18T09:30").await;
        assert!(slots.is_empty());
    }
}
