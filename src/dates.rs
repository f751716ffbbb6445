//! Due date parsing and display.
//!
//! Due dates are stored as UTC instants at midnight of the chosen day and
//! always compared by calendar date.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeDelta, TimeZone, Utc};

use crate::error::{Result, StoreError};

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - weekday names ("fri", "next monday")
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + TimeDelta::days(1)),
        "yesterday" => return Some(today - TimeDelta::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return TimeDelta::try_days(days).and_then(|d| today.checked_add_signed(d));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return TimeDelta::try_weeks(weeks).and_then(|d| today.checked_add_signed(d));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = today.weekday().num_days_from_monday() as i64;
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name {
            return Some(today + TimeDelta::days(ahead));
        }
        if s == format!("next {}", name) {
            let days = if ahead == 0 { 7 } else { ahead + 7 };
            return Some(today + TimeDelta::days(days));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Parse CLI due date input into the stored form.
pub fn due_from_input(s: &str) -> Result<DateTime<Utc>> {
    let today = Local::now().date_naive();
    parse_due_input(s, today)
        .map(to_utc_midnight)
        .ok_or_else(|| StoreError::InvalidDate { input: s.to_string() })
}

pub fn to_utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d.date_naive() - today).num_days();
            if days == 0 {
                "today".into()
            } else if days == 1 {
                "tomorrow".into()
            } else if days > 1 {
                format!("in {}d", days)
            } else {
                format!("{}d late", -days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_due_input() {
        // 2025-01-15 is a Wednesday.
        let today = day(2025, 1, 15);
        assert_eq!(parse_due_input("today", today), Some(today));
        assert_eq!(parse_due_input("Tomorrow", today), Some(day(2025, 1, 16)));
        assert_eq!(parse_due_input("in 3d", today), Some(day(2025, 1, 18)));
        assert_eq!(parse_due_input("in 2w", today), Some(day(2025, 1, 29)));
        assert_eq!(parse_due_input("fri", today), Some(day(2025, 1, 17)));
        assert_eq!(parse_due_input("wednesday", today), Some(today));
        assert_eq!(parse_due_input("next wed", today), Some(day(2025, 1, 22)));
        assert_eq!(parse_due_input("next monday", today), Some(day(2025, 1, 27)));
        assert_eq!(parse_due_input("2025-02-01", today), Some(day(2025, 2, 1)));
        assert_eq!(parse_due_input("someday", today), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = day(2025, 1, 15);
        let at = |d| Some(to_utc_midnight(d));
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(at(today), today), "today");
        assert_eq!(format_due_relative(at(day(2025, 1, 16)), today), "tomorrow");
        assert_eq!(format_due_relative(at(day(2025, 1, 20)), today), "in 5d");
        assert_eq!(format_due_relative(at(day(2025, 1, 13)), today), "2d late");
    }

    #[test]
    fn test_due_from_input_rejects_garbage() {
        assert!(matches!(due_from_input("whenever"), Err(StoreError::InvalidDate { .. })));
        assert_eq!(
            due_from_input("2030-07-04").unwrap().to_rfc3339(),
            "2030-07-04T00:00:00+00:00"
        );
    }

    #[test]
    fn test_out_of_range_offsets_are_rejected() {
        let today = day(2025, 1, 15);
        assert_eq!(parse_due_input("in 9999999999d", today), None);
        assert_eq!(parse_due_input("in 9999999999999w", today), None);
        assert_eq!(parse_due_input("in -3d", today), Some(day(2025, 1, 12)));
        assert!(matches!(
            due_from_input("in 9999999999d"),
            Err(StoreError::InvalidDate { .. })
        ));
    }
}
