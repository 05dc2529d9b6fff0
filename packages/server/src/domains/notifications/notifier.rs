use std::sync::Arc;

use tracing::{error, info, warn};

use super::templates::{format_timestamp, render};
use super::{NotificationKind, OutgoingEmail};
use crate::config::SendgridConfig;
use crate::kernel::BaseEmailService;

/// Best-effort error reporting by email.
///
/// `notify` never fails: a send error is logged and reported as `false`,
/// so the error being reported is always the one the caller returns.
#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn BaseEmailService>,
    to: String,
    from: String,
}

impl Notifier {
    pub fn new(email: Arc<dyn BaseEmailService>, to: String, from: String) -> Self {
        Self { email, to, from }
    }

    pub fn from_config(email: Arc<dyn BaseEmailService>, config: &SendgridConfig) -> Self {
        Self::new(email, config.to.clone(), config.from.clone())
    }

    /// Send an error email for `kind`. Returns whether it was delivered.
    pub async fn notify(
        &self,
        kind: NotificationKind,
        error_message: &str,
        phone_number: Option<&str>,
        generation_id: Option<&str>,
    ) -> bool {
        if error_message.is_empty() {
            error!("Cannot email a notification without an error message");
            return false;
        }

        let time = format_timestamp(&chrono::Local::now());
        let rendered = render(kind, &time, error_message, phone_number, generation_id);

        let email = OutgoingEmail {
            to: self.to.clone(),
            from: self.from.clone(),
            subject: rendered.subject,
            text: rendered.text,
        };

        match self.email.send(&email).await {
            Ok(200) | Ok(202) => {
                info!(kind = kind.as_str(), "Error email sent");
                true
            }
            Ok(status) => {
                error!(kind = kind.as_str(), status, "Failed to send the error email");
                false
            }
            Err(e) => {
                error!(kind = kind.as_str(), error = %e, "Error sending the error email");
                false
            }
        }
    }

    /// Same as [`Notifier::notify`] for a raw kind tag; unknown tags send nothing.
    pub async fn notify_tagged(
        &self,
        kind: &str,
        error_message: &str,
        phone_number: Option<&str>,
        generation_id: Option<&str>,
    ) -> bool {
        match kind.parse::<NotificationKind>() {
            Ok(kind) => {
                self.notify(kind, error_message, phone_number, generation_id)
                    .await
            }
            Err(_) => {
                warn!(kind, "Invalid notification kind, not emailing");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockEmailService;

    fn notifier(email: Arc<MockEmailService>) -> Notifier {
        Notifier::new(email, "ops@example.com".into(), "bot@example.com".into())
    }

    #[tokio::test]
    async fn test_sends_rendered_email() {
        let email = Arc::new(MockEmailService::new());
        let sent = notifier(email.clone())
            .notify(
                NotificationKind::ScrapeSong,
                "Invalid Suno credits number.",
                Some("+15550001"),
                Some("gen-1"),
            )
            .await;

        assert!(sent);
        let calls = email.sent();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to, "ops@example.com");
        assert_eq!(calls[0].from, "bot@example.com");
        assert!(calls[0].text.contains("Invalid Suno credits number."));
        assert!(!calls[0].subject.contains("{time}"));
    }

    #[tokio::test]
    async fn test_empty_message_sends_nothing() {
        let email = Arc::new(MockEmailService::new());
        let sent = notifier(email.clone())
            .notify(NotificationKind::SongStatus, "", None, Some("gen-1"))
            .await;

        assert!(!sent);
        assert!(email.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tag_sends_nothing() {
        let email = Arc::new(MockEmailService::new());
        let sent = notifier(email.clone())
            .notify_tagged("lyrics_video_error", "boom", None, None)
            .await;

        assert!(!sent);
        assert!(email.sent().is_empty());
    }

    #[tokio::test]
    async fn test_known_tag_sends() {
        let email = Arc::new(MockEmailService::new());
        let sent = notifier(email.clone())
            .notify_tagged("song_status_error", "boom", None, None)
            .await;

        assert!(sent);
        assert!(email.sent()[0].text.contains("Phone number: None"));
    }

    #[tokio::test]
    async fn test_accepted_status_counts_as_sent() {
        let email = Arc::new(MockEmailService::new().with_status(202));
        assert!(
            notifier(email)
                .notify(NotificationKind::SongStatus, "boom", None, None)
                .await
        );
    }

    #[tokio::test]
    async fn test_rejected_status_is_swallowed() {
        let email = Arc::new(MockEmailService::new().with_status(401));
        assert!(
            !notifier(email.clone())
                .notify(NotificationKind::SongStatus, "boom", None, None)
                .await
        );
        assert_eq!(email.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_swallowed() {
        let email = Arc::new(MockEmailService::new().failing("connection reset"));
        assert!(
            !notifier(email)
                .notify(NotificationKind::ScrapeSong, "boom", None, None)
                .await
        );
    }
}
