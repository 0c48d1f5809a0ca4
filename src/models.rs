use crate::date_key::DateKey;
use crate::podium::PodiumEntry;
use crate::streaks::StreakStats;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub type HabitId = String;

/// Prefix carried by ids of habits the user created themselves.
pub const CUSTOM_HABIT_PREFIX: &str = "h_";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKind {
    DailyMetrics,
    GymSet,
    Habits,
    Gut,
    Gratitude,
    Nutrition,
    LabResult,
    Other(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::DailyMetrics => "daily_metrics",
            Self::GymSet => "gym_set",
            Self::Habits => "habits",
            Self::Gut => "gut",
            Self::Gratitude => "gratitude",
            Self::Nutrition => "nutrition",
            Self::LabResult => "lab_result",
            Self::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "daily_metrics" => Self::DailyMetrics,
            "gym_set" => Self::GymSet,
            "habits" => Self::Habits,
            "gut" => Self::Gut,
            "gratitude" => Self::Gratitude,
            "nutrition" => Self::Nutrition,
            "lab_result" => Self::LabResult,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for EntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<Vec<HabitId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub data: EntryData,
}

impl LogEntry {
    /// The day this entry counts for on the local calendar.
    pub fn effective_date(&self) -> Option<DateKey> {
        self.effective_date_in(&Local)
    }

    /// `targetDate` when it is a valid key, otherwise the day of `timestamp` in `zone`.
    /// `None` when neither field yields a day.
    pub fn effective_date_in<Tz: TimeZone>(&self, zone: &Tz) -> Option<DateKey> {
        if let Some(date) = self
            .data
            .target_date
            .as_deref()
            .and_then(|raw| DateKey::parse(raw).ok())
        {
            return Some(date);
        }

        self.timestamp()
            .map(|instant| DateKey::from_instant(&instant.with_timezone(zone)))
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.data
            .timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn completed(&self) -> &[HabitId] {
        self.data.completed.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitConfig {
    pub id: HabitId,
    pub label: String,
    #[serde(default)]
    pub icon: String,
}

impl HabitConfig {
    fn builtin(id: &str, label: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
        }
    }
}

pub fn default_habits() -> Vec<HabitConfig> {
    vec![
        HabitConfig::builtin("water", "Water (3L)", "💧"),
        HabitConfig::builtin("oatmeal", "Eat Oatmeal", "🥣"),
        HabitConfig::builtin("probiotics", "Probiotics", "💊"),
        HabitConfig::builtin("psyllium", "Psyllium", "🌾"),
        HabitConfig::builtin("steps", "10k Steps", "👣"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserData {
    #[serde(default)]
    pub entries: Arc<Vec<LogEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habits: Option<Vec<HabitConfig>>,
}

impl UserData {
    pub fn configured_habits(&self) -> Vec<HabitConfig> {
        self.habits.clone().unwrap_or_else(default_habits)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: BTreeMap<String, UserData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStatus {
    pub date: DateKey,
    pub mood_logged: bool,
    pub gym_logged: bool,
    pub habits_done: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsResponse {
    pub today: TodayStatus,
    pub workout: StreakStats,
    pub podium: Vec<PodiumEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub start: DateKey,
    pub end: DateKey,
    pub category: String,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub user: Option<String>,
}
