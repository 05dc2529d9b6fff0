//! Error email templates.
//!
//! Placeholders: `{time}`, `{phoneNumber}`, `{generationId}`, `{errorMessage}`.

use chrono::{DateTime, TimeZone};

use super::NotificationKind;

/// Rendered in place of an absent phone number or generation id.
pub const ABSENT: &str = "None";

const SCRAPE_SONG_SUBJECT: &str = "[{time}] Error launching the Suno scraper task";
const SCRAPE_SONG_BODY: &str = "An error occurred while starting a scrape.\n\n\
Phone number: {phoneNumber}\n\
Generation ID: {generationId}\n\n\
Error: {errorMessage}";

const SONG_STATUS_SUBJECT: &str = "[{time}] Error checking the Suno scraper task";
const SONG_STATUS_BODY: &str = "An error occurred while checking a scrape.\n\n\
Phone number: {phoneNumber}\n\
Generation ID: {generationId}\n\n\
Error: {errorMessage}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
}

/// `DD/MM/YY HH:MM:SS`
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%d/%m/%y %H:%M:%S").to_string()
}

fn or_absent(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(ABSENT)
}

pub fn render(
    kind: NotificationKind,
    time: &str,
    error_message: &str,
    phone_number: Option<&str>,
    generation_id: Option<&str>,
) -> RenderedEmail {
    let (subject, body) = match kind {
        NotificationKind::ScrapeSong => (SCRAPE_SONG_SUBJECT, SCRAPE_SONG_BODY),
        NotificationKind::SongStatus => (SONG_STATUS_SUBJECT, SONG_STATUS_BODY),
    };

    let fill = |template: &str| {
        template
            .replace("{time}", time)
            .replace("{phoneNumber}", or_absent(phone_number))
            .replace("{generationId}", or_absent(generation_id))
            .replace("{errorMessage}", error_message)
    };

    RenderedEmail {
        subject: fill(subject),
        text: fill(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_timestamp(&at), "07/03/24 09:05:02");
    }

    #[test]
    fn test_every_placeholder_is_filled() {
        for kind in [NotificationKind::ScrapeSong, NotificationKind::SongStatus] {
            let email = render(kind, "01/01/24 00:00:00", "boom", Some("+15550001"), Some("gen-1"));
            for rendered in [&email.subject, &email.text] {
                assert!(!rendered.contains('{'), "unfilled placeholder in {:?}", rendered);
            }
            assert!(email.subject.contains("01/01/24 00:00:00"));
            assert!(email.text.contains("+15550001"));
            assert!(email.text.contains("gen-1"));
            assert!(email.text.contains("Error: boom"));
        }
    }

    #[test]
    fn test_absent_identifiers_render_as_none() {
        let email = render(NotificationKind::SongStatus, "t", "boom", None, Some(""));
        assert!(email.text.contains("Phone number: None"));
        assert!(email.text.contains("Generation ID: None"));
    }

    #[test]
    fn test_subjects_differ_by_kind() {
        let launch = render(NotificationKind::ScrapeSong, "t", "e", None, None);
        let status = render(NotificationKind::SongStatus, "t", "e", None, None);
        assert_ne!(launch.subject, status.subject);
    }
}
