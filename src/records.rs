use crate::date_key::DateKey;
use crate::habits::{build_series, completed_on};
use crate::models::{EntryKind, HabitConfig, LogEntry, RecordsResponse, TodayStatus};
use crate::podium::build_podium_at;
use crate::streaks::{StreakStats, compute_stats_at};

pub fn build_records(entries: &[LogEntry], habits: &[HabitConfig]) -> RecordsResponse {
    build_records_at(DateKey::today(), entries, habits)
}

pub fn build_records_at(today: DateKey, entries: &[LogEntry], habits: &[HabitConfig]) -> RecordsResponse {
    let series = build_series(entries);

    RecordsResponse {
        today: today_status(today, entries),
        workout: workout_stats_at(today, entries),
        podium: build_podium_at(today, habits, &series),
    }
}

/// Streak of days with at least one gym set logged.
pub fn workout_stats_at(today: DateKey, entries: &[LogEntry]) -> StreakStats {
    compute_stats_at(today, dates_of(entries, &EntryKind::GymSet))
}

pub fn today_status(today: DateKey, entries: &[LogEntry]) -> TodayStatus {
    let logged = |kind: &EntryKind| dates_of(entries, kind).any(|date| date == today);

    TodayStatus {
        date: today,
        mood_logged: logged(&EntryKind::DailyMetrics),
        gym_logged: logged(&EntryKind::GymSet),
        habits_done: completed_on(entries, today),
    }
}

fn dates_of<'a>(entries: &'a [LogEntry], kind: &'a EntryKind) -> impl Iterator<Item = DateKey> + 'a {
    entries
        .iter()
        .filter(move |entry| &entry.kind == kind)
        .filter_map(LogEntry::effective_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_habits;

    fn entry(kind: &str, date: &str, extra: serde_json::Value) -> LogEntry {
        let mut data = serde_json::json!({ "targetDate": date, "timestamp": format!("{date}T12:00:00Z") });
        if let (Some(data), Some(extra)) = (data.as_object_mut(), extra.as_object()) {
            data.extend(extra.clone());
        }
        serde_json::from_value(serde_json::json!({ "id": format!("{kind}-{date}"), "type": kind, "data": data }))
            .unwrap()
    }

    fn key(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn workout_streak_counts_days_not_sets() {
        let today = key("2026-01-05");
        let entries = vec![
            entry("gym_set", "2026-01-04", serde_json::json!({ "exercise": "Squat" })),
            entry("gym_set", "2026-01-04", serde_json::json!({ "exercise": "Row" })),
            entry("gym_set", "2026-01-03", serde_json::json!({ "exercise": "Press" })),
            entry("daily_metrics", "2026-01-05", serde_json::json!({ "mood": 4 })),
        ];
        let stats = workout_stats_at(today, &entries);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.max_streak_date, Some(key("2026-01-04")));
    }

    #[test]
    fn today_status_reflects_todays_logs() {
        let today = key("2026-01-05");
        let entries = vec![
            entry("daily_metrics", "2026-01-05", serde_json::json!({ "mood": 4 })),
            entry("gym_set", "2026-01-04", serde_json::json!({ "exercise": "Squat" })),
            entry("habits", "2026-01-05", serde_json::json!({ "completed": ["water", "steps"] })),
        ];
        let status = today_status(today, &entries);
        assert!(status.mood_logged);
        assert!(!status.gym_logged);
        assert_eq!(status.habits_done, 2);
    }

    #[test]
    fn records_combine_workout_and_podium() {
        let today = key("2026-01-05");
        let entries = vec![
            entry("habits", "2026-01-04", serde_json::json!({ "completed": ["water", "oatmeal"] })),
            entry("habits", "2026-01-05", serde_json::json!({ "completed": ["water"] })),
            entry("habits", "2025-12-20", serde_json::json!({ "completed": ["psyllium"] })),
            entry("gym_set", "2026-01-05", serde_json::json!({ "exercise": "Squat" })),
        ];
        let records = build_records_at(today, &entries, &default_habits());
        assert_eq!(records.workout.current_streak, 1);
        assert!(records.today.gym_logged);

        let order: Vec<&str> = records.podium.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order[..3], ["water", "oatmeal", "psyllium"]);
        assert_eq!(records.podium[1].stats.current_streak, 1);
        assert_eq!(records.podium[2].stats.current_streak, 0);
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let records = build_records_at(key("2026-01-05"), &[], &default_habits());
        assert_eq!(records.workout, StreakStats::default());
        assert_eq!(records.podium.len(), 5);
        assert!(records.podium.iter().all(|p| p.stats == StreakStats::default()));
        assert_eq!(records.today.habits_done, 0);
    }
}
