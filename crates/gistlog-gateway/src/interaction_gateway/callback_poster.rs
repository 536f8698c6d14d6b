//! Delivery of finished reports to an interaction's response URL.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("delivery failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct DeliveryPayload<'a> {
    text: &'a str,
    token: &'a str,
}

/// Posts `{text, token}` to a delivery address. One attempt per report.
#[derive(Debug, Clone)]
pub struct CallbackPoster {
    http: reqwest::Client,
    verification_token: String,
}

impl CallbackPoster {
    pub fn new(verification_token: &str) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .user_agent("gistlog-bot")
            .build()?;
        Ok(Self {
            http,
            verification_token: verification_token.to_string(),
        })
    }

    pub async fn deliver(&self, response_url: &str, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(response_url)
            .json(&DeliveryPayload {
                text,
                token: &self.verification_token,
            })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(DeliveryError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!(response_url, body = %body, "report delivered");
        Ok(())
    }
}
