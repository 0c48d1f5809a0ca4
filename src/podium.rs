use crate::date_key::DateKey;
use crate::models::{CUSTOM_HABIT_PREFIX, HabitConfig, HabitId};
use crate::streaks::{StreakStats, compute_stats_at};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

const CUSTOM_HABIT_LABEL: &str = "Custom Habit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodiumEntry {
    pub id: HabitId,
    pub label: String,
    #[serde(flatten)]
    pub stats: StreakStats,
}

impl PodiumEntry {
    pub fn new(id: impl Into<HabitId>, label: impl Into<String>, stats: StreakStats) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            stats,
        }
    }
}

/// Active streaks first, then longer current streaks, then longer best streaks.
pub fn podium_order(a: &PodiumEntry, b: &PodiumEntry) -> Ordering {
    b.stats
        .is_active()
        .cmp(&a.stats.is_active())
        .then_with(|| b.stats.current_streak.cmp(&a.stats.current_streak))
        .then_with(|| b.stats.max_streak.cmp(&a.stats.max_streak))
}

pub fn rank(entries: &mut [PodiumEntry]) {
    entries.sort_by(podium_order);
}

/// Ranks every configured habit plus every habit that still has history.
///
/// Habits no longer configured keep their history and get a fallback label.
/// Ties keep configured order first, then remaining ids in sorted order.
pub fn build_podium_at(
    today: DateKey,
    configured: &[HabitConfig],
    series: &BTreeMap<HabitId, Vec<DateKey>>,
) -> Vec<PodiumEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let ids = configured
        .iter()
        .map(|habit| habit.id.as_str())
        .chain(series.keys().map(String::as_str))
        .filter(|id| seen.insert(*id))
        .collect::<Vec<_>>();

    let mut podium: Vec<PodiumEntry> = ids
        .into_iter()
        .map(|id| {
            let dates = series.get(id).map(Vec::as_slice).unwrap_or_default();
            let stats = compute_stats_at(today, dates.iter().copied());
            PodiumEntry::new(id, label_for(id, configured), stats)
        })
        .collect();

    rank(&mut podium);
    podium
}

/// Entries worth displaying: habits that were logged at least once.
pub fn visible(podium: &[PodiumEntry]) -> impl Iterator<Item = &PodiumEntry> {
    podium.iter().filter(|entry| entry.stats.max_streak > 0)
}

fn label_for(id: &str, configured: &[HabitConfig]) -> String {
    if let Some(habit) = configured.iter().find(|habit| habit.id == id) {
        return habit.label.clone();
    }
    if id.starts_with(CUSTOM_HABIT_PREFIX) {
        CUSTOM_HABIT_LABEL.to_string()
    } else {
        id.to_string()
    }
}
