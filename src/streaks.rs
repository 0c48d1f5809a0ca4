use crate::date_key::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: u32,
    pub max_streak: u32,
    /// Last day of the earliest run that reached `max_streak`.
    pub max_streak_date: Option<DateKey>,
}

impl StreakStats {
    pub fn is_active(&self) -> bool {
        self.current_streak > 0
    }
}

pub fn compute_stats<I>(dates: I) -> StreakStats
where
    I: IntoIterator<Item = DateKey>,
{
    compute_stats_at(DateKey::today(), dates)
}

/// Streak statistics for one series as seen on `today`.
///
/// Duplicates and input order do not matter. The current streak counts back
/// from today, or from yesterday when today has not been logged yet.
pub fn compute_stats_at<I>(today: DateKey, dates: I) -> StreakStats
where
    I: IntoIterator<Item = DateKey>,
{
    let unique: BTreeSet<DateKey> = dates.into_iter().collect();
    if unique.is_empty() {
        return StreakStats::default();
    }

    let mut stats = StreakStats::default();
    let mut run = 0u32;
    let mut previous: Option<i64> = None;
    for date in &unique {
        let epoch = date.epoch_day();
        run = match previous {
            Some(last) if epoch - last == 1 => run.saturating_add(1),
            _ => 1,
        };
        if run > stats.max_streak {
            stats.max_streak = run;
            stats.max_streak_date = Some(*date);
        }
        previous = Some(epoch);
    }

    let yesterday = today.add_days(-1);
    let mut cursor = if unique.contains(&today) {
        today
    } else if unique.contains(&yesterday) {
        yesterday
    } else {
        return stats;
    };

    while unique.contains(&cursor) {
        stats.current_streak = stats.current_streak.saturating_add(1);
        let next = cursor.add_days(-1);
        if next == cursor {
            break;
        }
        cursor = next;
    }

    stats
}
