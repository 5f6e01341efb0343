//! Calendar reminders: one 30 minute event written as an `.ics` file.

use std::path::{Path, PathBuf};

use aide_core::{ActionResult, Category};
use chrono::{Duration, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::platform::Opener;

/// Accepted input format for reminder times.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Length of every reminder event.
pub const EVENT_MINUTES: i64 = 30;

const ICS_TIME: &str = "%Y%m%dT%H%M%S";

/// Longest content line, in octets, before folding.
const LINE_OCTETS: usize = 75;

/// Parse a `YYYY-MM-DD HH:MM` reminder time.
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, HandlerError> {
    NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
        .map_err(|_| HandlerError::InvalidDateTime(text.to_string()))
}

/// File name for a reminder starting at `start`.
pub fn file_name(start: NaiveDateTime) -> String {
    format!("reminder_{}.ics", start.format("%Y%m%d_%H%M"))
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
}

/// Fold a content line into chunks of at most 75 octets, continuation
/// lines starting with a space. Never splits a UTF-8 character.
fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        if width + ch.len_utf8() > LINE_OCTETS {
            folded.push_str("\r\n ");
            width = 1;
        }
        folded.push(ch);
        width += ch.len_utf8();
    }
    folded
}

/// Serialize a single-event calendar. Times are floating local times.
pub fn render_calendar(start: NaiveDateTime, message: &str) -> String {
    let end = start + Duration::minutes(EVENT_MINUTES);
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Aide//Reminders//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@aide", uuid::Uuid::new_v4()),
        format!("DTSTAMP:{}Z", Utc::now().format(ICS_TIME)),
        format!("DTSTART:{}", start.format(ICS_TIME)),
        format!("DTEND:{}", end.format(ICS_TIME)),
        format!("SUMMARY:{}", escape_text(message)),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut calendar = lines.iter().map(|line| fold_line(line)).collect::<Vec<_>>().join("\r\n");
    calendar.push_str("\r\n");
    calendar
}

/// Write the reminder under `dir` and return its path.
pub async fn write_reminder(dir: &Path, datetime: &str, message: &str) -> Result<PathBuf, HandlerError> {
    let start = parse_datetime(datetime)?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(file_name(start));
    tokio::fs::write(&path, render_calendar(start, message)).await?;
    info!(path = %path.display(), start = %start, "Reminder written");
    Ok(path)
}

/// Create the reminder and open it with the default calendar handler.
///
/// Never fails past this boundary: problems come back as a failed result.
pub async fn create_reminder(dir: &Path, opener: &dyn Opener, datetime: &str, message: &str) -> ActionResult {
    let argument = format!("{} {}", datetime.trim(), message);

    let path = match write_reminder(dir, datetime, message).await {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "Reminder not created");
            return ActionResult::failure(Category::Reminder, argument, e.to_string());
        }
    };

    if let Err(e) = opener.open_path(&path).await {
        // The file exists; only the hand-off to the calendar app failed.
        warn!(error = %e, path = %path.display(), "Could not open reminder");
    }

    ActionResult::success(
        Category::Reminder,
        argument,
        format!("Reminder saved to {}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::FakeSystem;

    #[test]
    fn test_parse_datetime() {
        let start = parse_datetime("2026-10-20 14:30").unwrap();
        assert_eq!(file_name(start), "reminder_20261020_1430.ics");
        assert!(matches!(
            parse_datetime("tomorrow at noon"),
            Err(HandlerError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn test_calendar_has_thirty_minute_event() {
        let start = parse_datetime("2026-10-20 23:45").unwrap();
        let ics = render_calendar(start, "Call mom, then dentist; bring card");

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTART:20261020T234500\r\n"));
        assert!(ics.contains("DTEND:20261021T001500\r\n"));
        assert!(ics.contains("SUMMARY:Call mom\\, then dentist\\; bring card\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_carriage_returns_are_escaped() {
        assert_eq!(escape_text("first\r\nsecond\rthird\nfourth"), "first\\nsecond\\nthird\\nfourth");
    }

    #[test]
    fn test_long_summary_is_folded() {
        let start = parse_datetime("2026-10-20 09:00").unwrap();
        let message = "Remember to renew the passport and book the visa appointment before the trip to Lisbon in spring";
        let ics = render_calendar(start, message);

        for line in ics.split("\r\n") {
            assert!(line.len() <= LINE_OCTETS, "line too long: {:?}", line);
        }

        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}\r\n", message)));
    }

    #[test]
    fn test_folding_keeps_multibyte_characters_whole() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold_line(&line);

        for part in folded.split("\r\n") {
            assert!(part.len() <= LINE_OCTETS);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[tokio::test]
    async fn test_create_reminder_writes_and_opens() {
        let dir = tempfile::tempdir().unwrap();
        let reminders = dir.path().join("reminders");
        let opener = FakeSystem::default();

        let result = create_reminder(&reminders, &opener, "2026-10-20 09:00", "Stand-up").await;

        assert!(result.success);
        let path = reminders.join("reminder_20261020_0900.ics");
        assert!(path.exists());
        assert_eq!(opener.paths(), vec![path]);
    }

    #[tokio::test]
    async fn test_bad_datetime_is_a_failed_result() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeSystem::default();

        let result = create_reminder(dir.path(), &opener, "20-10-2026", "Stand-up").await;

        assert!(!result.success);
        assert!(result.message.unwrap().contains("YYYY-MM-DD HH:MM"));
        assert!(opener.paths().is_empty());
    }
}
