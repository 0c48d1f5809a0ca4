use crate::date_key::DateKey;
use crate::models::{EntryKind, LogEntry};
use chrono::{Local, TimeZone};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportCategory {
    #[default]
    All,
    Gym,
    Metrics,
    Nutrition,
    Gut,
    Labs,
}

impl ReportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Gym => "gym",
            Self::Metrics => "metrics",
            Self::Nutrition => "nutrition",
            Self::Gut => "gut",
            Self::Labs => "labs",
        }
    }

    pub fn matches(&self, kind: &EntryKind) -> bool {
        match self {
            Self::All => true,
            Self::Gym => *kind == EntryKind::GymSet,
            Self::Metrics => *kind == EntryKind::DailyMetrics,
            Self::Nutrition => *kind == EntryKind::Nutrition,
            Self::Gut => *kind == EntryKind::Gut,
            Self::Labs => *kind == EntryKind::LabResult,
        }
    }
}

impl FromStr for ReportCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "gym" => Ok(Self::Gym),
            "metrics" => Ok(Self::Metrics),
            "nutrition" => Ok(Self::Nutrition),
            "gut" => Ok(Self::Gut),
            "labs" => Ok(Self::Labs),
            other => Err(format!("unknown report category '{other}'")),
        }
    }
}

pub fn in_range(entry: &LogEntry, start: DateKey, end: DateKey) -> bool {
    in_range_in(&Local, entry, start, end)
}

/// Inclusive on both ends. Entries without a usable date are never in range.
pub fn in_range_in<Tz: TimeZone>(zone: &Tz, entry: &LogEntry, start: DateKey, end: DateKey) -> bool {
    entry
        .effective_date_in(zone)
        .is_some_and(|date| start <= date && date <= end)
}

pub fn filter_entries(
    entries: &[LogEntry],
    start: DateKey,
    end: DateKey,
    category: ReportCategory,
) -> Vec<&LogEntry> {
    filter_entries_in(&Local, entries, start, end, category)
}

/// Entries in `[start, end]` of the given category, oldest day first.
pub fn filter_entries_in<'a, Tz: TimeZone>(
    zone: &Tz,
    entries: &'a [LogEntry],
    start: DateKey,
    end: DateKey,
    category: ReportCategory,
) -> Vec<&'a LogEntry> {
    let mut matched: Vec<&LogEntry> = entries
        .iter()
        .filter(|entry| category.matches(&entry.kind) && in_range_in(zone, entry, start, end))
        .collect();
    matched.sort_by_cached_key(|entry| entry.effective_date_in(zone));
    matched
}
