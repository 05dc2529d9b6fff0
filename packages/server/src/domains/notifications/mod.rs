//! Notifications domain - error emails to operators
//!
//! Responsibilities:
//! - Rendering the error email for each handler
//! - Sending it without ever masking the error being reported

mod notifier;
pub mod templates;

use std::fmt;
use std::str::FromStr;

pub use notifier::Notifier;

/// Which handler an error email is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    ScrapeSong,
    SongStatus,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ScrapeSong => "scrape_song_error",
            NotificationKind::SongStatus => "song_status_error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNotificationKind(pub String);

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scrape_song_error" => Ok(NotificationKind::ScrapeSong),
            "song_status_error" => Ok(NotificationKind::SongStatus),
            other => Err(UnknownNotificationKind(other.to_string())),
        }
    }
}

/// A plain-text email ready to hand to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
}
