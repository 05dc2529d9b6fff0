// https://www.twilio.com/docs/sendgrid/api-reference/mail-send/mail-send

pub mod models;

use reqwest::{header, Client};

pub use crate::models::MailSendRequest;

const MAIL_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, thiserror::Error)]
pub enum SendgridError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct SendgridOptions {
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendgridService {
    options: SendgridOptions,
    client: Client,
}

impl SendgridService {
    pub fn new(options: SendgridOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn url(&self) -> &str {
        self.options.base_url.as_deref().unwrap_or(MAIL_SEND_URL)
    }

    /// Send a plain-text email.
    ///
    /// Returns the HTTP status code SendGrid answered with; SendGrid replies
    /// `202 Accepted` when the message is queued. Only transport failures are
    /// errors, so callers decide which status codes count as delivered.
    pub async fn send_plain_text(
        &self,
        to: &str,
        from: &str,
        subject: &str,
        text: &str,
    ) -> Result<u16, SendgridError> {
        let body = MailSendRequest::plain_text(to, from, subject, text);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.options.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %error_body, "SendGrid returned an error");
        }

        Ok(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_payload_shape() {
        let body = MailSendRequest::plain_text("ops@example.com", "bot@example.com", "Subject", "Body");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["personalizations"][0]["to"][0]["email"], "ops@example.com");
        assert_eq!(json["from"]["email"], "bot@example.com");
        assert_eq!(json["subject"], "Subject");
        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(json["content"][0]["value"], "Body");
    }

    #[test]
    fn test_base_url_override() {
        let service = SendgridService::new(SendgridOptions {
            api_key: "key".to_string(),
            base_url: Some("http://localhost:9999/send".to_string()),
        });
        assert_eq!(service.url(), "http://localhost:9999/send");

        let default = SendgridService::new(SendgridOptions {
            api_key: "key".to_string(),
            base_url: None,
        });
        assert_eq!(default.url(), MAIL_SEND_URL);
    }
}
