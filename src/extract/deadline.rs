//! Deadline extraction from announcement text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Matches dd/mm/yyyy, dd/mm/yy and dd/mm in one pass.
static DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{2})/(\d{2})(?:/(\d{4}|\d{2}))?\b").unwrap()
});

/// Scan `text` for date-like substrings and return the latest one.
///
/// Announcements mention several dates (publication, exam, inscription close);
/// the inscription-close date is chronologically last, so the maximum wins.
/// Two-digit years are expanded into the 2000s. Dates with no year get
/// `reference.year`, bumped one year forward when the month has already
/// passed (year-end listings closing in January). Unparseable candidates are
/// skipped silently; `None` means no date was found at all.
pub fn extract_deadline(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    let mut latest: Option<NaiveDate> = None;

    for caps in DATE_SHAPE.captures_iter(text) {
        let (Ok(day), Ok(month)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };

        let year: i32 = match caps.get(3).map(|y| y.as_str()) {
            Some(y) => {
                let Ok(parsed) = y.parse::<i32>() else { continue };
                if y.len() == 2 { 2000 + parsed } else { parsed }
            }
            None if month < reference.month() => reference.year() + 1,
            None => reference.year(),
        };

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            latest = Some(latest.map_or(date, |d| d.max(date)));
        }
    }

    latest
}
