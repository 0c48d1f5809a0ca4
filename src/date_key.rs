//! Calendar-day keys in `YYYY-MM-DD` form.
//!
//! A [`DateKey`] names a day on the user's local calendar. Ordering of keys is
//! chronological and matches the lexicographic order of their string form.

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};

const FORMAT: &str = "%Y-%m-%d";

// Offset changes happen on quarter-hour boundaries.
const GAP_STEP_MINUTES: i64 = 15;
const GAP_STEPS_PER_DAY: usize = 24 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Not shaped like `YYYY-MM-DD`.
    Shape(String),
    /// Shaped correctly but not a real calendar day, e.g. `2023-02-30`.
    Calendar(String),
}

impl fmt::Display for DateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(value) => write!(f, "'{value}' is not a YYYY-MM-DD date"),
            Self::Calendar(value) => write!(f, "'{value}' is not a calendar day"),
        }
    }
}

impl std::error::Error for DateKeyError {}

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today on the local system calendar.
    pub fn today() -> Self {
        Self::from_instant(&Local::now())
    }

    /// The calendar day `instant` falls on in its own timezone.
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let bytes = value.as_bytes();
        let shaped = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(idx, byte)| idx == 4 || idx == 7 || byte.is_ascii_digit());
        if !shaped {
            return Err(DateKeyError::Shape(value.to_string()));
        }

        NaiveDate::parse_from_str(value, FORMAT)
            .map(Self)
            .map_err(|_| DateKeyError::Calendar(value.to_string()))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Day number counting 0001-01-01 as day 1.
    /// Two keys are adjacent iff their epoch days differ by one.
    pub fn epoch_day(self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// Shifts by whole calendar days. Saturates at the ends of the representable range.
    pub fn add_days(self, days: i64) -> Self {
        match shift_date(self.0, days) {
            Some(date) => Self(date),
            None if days > 0 => Self(NaiveDate::MAX),
            None => Self(NaiveDate::MIN),
        }
    }
}

/// Shifts an instant by whole calendar days, keeping its local wall-clock time.
///
/// Works on the date fields rather than adding multiples of 24 hours, so a
/// shift across a daylight-saving change still lands on the neighbouring day.
/// A wall-clock time repeated by a change resolves to its earlier instant; one
/// skipped by a change moves forward to the first time after the gap. `None`
/// only when the shifted day is out of range.
pub fn add_days_to_instant<Tz: TimeZone>(instant: &DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    let zone = instant.timezone();
    let wall = instant.naive_local();
    let mut shifted = shift_date(wall.date(), days)?.and_time(wall.time());

    for _ in 0..GAP_STEPS_PER_DAY {
        if let Some(resolved) = zone.from_local_datetime(&shifted).earliest() {
            return Some(resolved);
        }
        shifted = shifted.checked_add_signed(Duration::minutes(GAP_STEP_MINUTES))?;
    }
    None
}

fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn key(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn display_is_zero_padded() {
        let date = DateKey::from_ymd(2024, 3, 9).unwrap();
        assert_eq!(date.to_string(), "2024-03-09");
    }

    #[test]
    fn parse_rejects_unpadded_and_impossible_days() {
        assert!(matches!(DateKey::parse("2024-3-9"), Err(DateKeyError::Shape(_))));
        assert!(matches!(DateKey::parse("2024-03-09T10:00"), Err(DateKeyError::Shape(_))));
        assert!(matches!(DateKey::parse(""), Err(DateKeyError::Shape(_))));
        assert!(matches!(DateKey::parse("2023-02-29"), Err(DateKeyError::Calendar(_))));
        assert_eq!(key("2024-02-29").to_string(), "2024-02-29");
    }

    #[test]
    fn ordering_matches_string_order() {
        let mut keys = vec![key("2024-10-01"), key("2024-09-30"), key("2023-12-31")];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let mut strings = rendered.clone();
        strings.sort();
        assert_eq!(rendered, strings);
    }

    #[test]
    fn add_days_crosses_dst_and_month_boundaries() {
        assert_eq!(key("2024-03-09").add_days(1), key("2024-03-10"));
        assert_eq!(key("2024-11-03").add_days(-1), key("2024-11-02"));
        assert_eq!(key("2024-03-01").add_days(-1), key("2024-02-29"));
        assert_eq!(key("2023-12-31").add_days(1), key("2024-01-01"));
    }

    #[test]
    fn epoch_days_are_adjacent_across_month_end() {
        assert_eq!(key("2024-03-01").epoch_day() - key("2024-02-29").epoch_day(), 1);
        assert_eq!(key("2025-01-01").epoch_day() - key("2024-12-31").epoch_day(), 1);
    }

    #[test]
    fn epoch_day_counts_first_day_as_one() {
        assert_eq!(key("0001-01-01").epoch_day(), 1);
        assert_eq!(key("0001-01-02").epoch_day(), 2);
    }

    #[test]
    fn from_instant_uses_zone_calendar() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let instant = DateTime::parse_from_rfc3339("2024-01-01T23:30:00Z")
            .unwrap()
            .with_timezone(&zone);
        assert_eq!(DateKey::from_instant(&instant), key("2024-01-02"));
    }

    #[test]
    fn add_days_to_instant_keeps_wall_clock() {
        let instant = DateTime::parse_from_rfc3339("2024-03-09T22:15:00-05:00").unwrap();
        let next = add_days_to_instant(&instant, 1).unwrap();
        assert_eq!(DateKey::from_instant(&next), key("2024-03-10"));
        assert_eq!(next.hour(), 22);

        let back = add_days_to_instant(&instant, -9).unwrap();
        assert_eq!(DateKey::from_instant(&back), key("2024-02-29"));
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&key("2026-01-05")).unwrap();
        assert_eq!(json, "\"2026-01-05\"");
        let parsed: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key("2026-01-05"));
        assert!(serde_json::from_str::<DateKey>("\"2026-1-5\"").is_err());
    }
}
