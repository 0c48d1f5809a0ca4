use crate::date_key::DateKey;
use crate::models::{EntryKind, HabitId, LogEntry};
use chrono::{Local, TimeZone};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub fn latest_per_day(entries: &[LogEntry]) -> BTreeMap<DateKey, &LogEntry> {
    latest_per_day_in(&Local, entries)
}

/// One `habits` entry per day: the one saved last.
///
/// Every toggle saves the full set of completed ids, so the latest save for a
/// day supersedes earlier ones. On equal timestamps the first entry seen is kept.
/// Entries without a valid `targetDate` are placed on their timestamp's day in `zone`.
pub fn latest_per_day_in<'a, Tz: TimeZone>(zone: &Tz, entries: &'a [LogEntry]) -> BTreeMap<DateKey, &'a LogEntry> {
    let mut by_day: BTreeMap<DateKey, &LogEntry> = BTreeMap::new();
    for entry in entries.iter().filter(|entry| entry.kind == EntryKind::Habits) {
        let Some(date) = entry.effective_date_in(zone) else {
            debug!(id = %entry.id, "skipping habits entry without a usable date");
            continue;
        };

        by_day
            .entry(date)
            .and_modify(|kept| {
                if entry.timestamp() > kept.timestamp() {
                    *kept = entry;
                }
            })
            .or_insert(entry);
    }
    by_day
}

pub fn build_series(entries: &[LogEntry]) -> BTreeMap<HabitId, Vec<DateKey>> {
    build_series_in(&Local, entries)
}

/// Dates each habit was completed on, keyed by habit id.
pub fn build_series_in<Tz: TimeZone>(zone: &Tz, entries: &[LogEntry]) -> BTreeMap<HabitId, Vec<DateKey>> {
    let mut series: BTreeMap<HabitId, Vec<DateKey>> = BTreeMap::new();
    for (date, entry) in latest_per_day_in(zone, entries) {
        let distinct: HashSet<&HabitId> = entry.completed().iter().collect();
        for habit in distinct {
            series.entry(habit.clone()).or_default().push(date);
        }
    }
    series
}

/// Number of distinct habits in the latest snapshot saved for `date`.
pub fn completed_on(entries: &[LogEntry], date: DateKey) -> usize {
    latest_per_day(entries)
        .get(&date)
        .map(|entry| entry.completed().iter().collect::<HashSet<_>>().len())
        .unwrap_or(0)
}
