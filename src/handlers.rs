use crate::date_key::DateKey;
use crate::errors::AppError;
use crate::models::{
    HabitConfig, LogEntry, PageQuery, RecordsResponse, ReportQuery, ReportResponse, UserData,
};
use crate::records::build_records;
use crate::report::{ReportCategory, filter_entries};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::{SecondsFormat, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

static ENTRY_SEQ: AtomicU64 = AtomicU64::new(0);

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Result<Html<String>, AppError> {
    let user = match query.user {
        Some(user) => validate_user(&user)?,
        None => state.default_user.clone(),
    };
    let snapshot = state.snapshot(&user).await;
    let records = build_records(&snapshot.entries, &snapshot.habits);
    Ok(Html(render_index(&user, &records)))
}

pub async fn get_entries(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    let user = validate_user(&user)?;
    let snapshot = state.snapshot(&user).await;
    Ok(Json(snapshot.entries.to_vec()))
}

/// Replaces the user's entries wholesale; the body is the complete new snapshot.
pub async fn replace_entries(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(entries): Json<Vec<LogEntry>>,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    let user = validate_user(&user)?;
    let entries: Vec<LogEntry> = entries.into_iter().map(prepare_entry).collect();
    let count = entries.len();
    let stored = update_user(&state, &user, |data| {
        data.entries = Arc::new(entries);
        Ok(data.entries.to_vec())
    })
    .await?;

    info!(%user, count, "replaced entry snapshot");
    Ok(Json(stored))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(entry): Json<LogEntry>,
) -> Result<(StatusCode, Json<LogEntry>), AppError> {
    let user = validate_user(&user)?;
    let entry = prepare_entry(entry);
    let stored = update_user(&state, &user, |data| {
        if data.entries.iter().any(|existing| existing.id == entry.id) {
            return Err(AppError::bad_request(format!("entry '{}' already exists", entry.id)));
        }
        Arc::make_mut(&mut data.entries).push(entry.clone());
        Ok(entry)
    })
    .await?;

    debug!(%user, id = %stored.id, kind = stored.kind.as_str(), "added entry");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((user, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let user = validate_user(&user)?;
    update_user(&state, &user, |data| {
        let Some(position) = data.entries.iter().position(|entry| entry.id == id) else {
            return Err(AppError::not_found(format!("no entry '{id}'")));
        };
        Arc::make_mut(&mut data.entries).remove(position);
        Ok(())
    })
    .await?;

    debug!(%user, %id, "deleted entry");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_habits(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<Vec<HabitConfig>>, AppError> {
    let user = validate_user(&user)?;
    Ok(Json(state.snapshot(&user).await.habits))
}

pub async fn put_habits(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(habits): Json<Vec<HabitConfig>>,
) -> Result<Json<Vec<HabitConfig>>, AppError> {
    let user = validate_user(&user)?;
    validate_habits(&habits)?;
    let stored = update_user(&state, &user, |data| {
        data.habits = Some(habits);
        Ok(data.configured_habits())
    })
    .await?;

    info!(%user, count = stored.len(), "updated habit list");
    Ok(Json(stored))
}

pub async fn get_records(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<RecordsResponse>, AppError> {
    let user = validate_user(&user)?;
    let snapshot = state.snapshot(&user).await;
    Ok(Json(build_records(&snapshot.entries, &snapshot.habits)))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, AppError> {
    let user = validate_user(&user)?;
    let today = DateKey::today();
    let start = parse_bound(query.start.as_deref(), today)?;
    let end = parse_bound(query.end.as_deref(), today)?;
    let category = match query.category.as_deref() {
        Some(raw) => raw.parse::<ReportCategory>().map_err(AppError::bad_request)?,
        None => ReportCategory::All,
    };

    let snapshot = state.snapshot(&user).await;
    let entries = filter_entries(&snapshot.entries, start, end, category)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ReportResponse {
        start,
        end,
        category: category.as_str().to_string(),
        entries,
    }))
}

async fn update_user<T>(
    state: &AppState,
    user: &str,
    apply: impl FnOnce(&mut UserData) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut data = state.data.lock().await;
    // Users appear in the store only once a change to them succeeds.
    let users = &mut data.users;
    let result = match users.get_mut(user) {
        Some(existing) => apply(existing)?,
        None => {
            let mut created = UserData::default();
            let result = apply(&mut created)?;
            users.insert(user.to_string(), created);
            result
        }
    };
    persist_data(&state.data_path, &data).await?;
    Ok(result)
}

/// Fills in an id and save time for entries that arrive without them.
fn prepare_entry(mut entry: LogEntry) -> LogEntry {
    if entry.id.trim().is_empty() {
        entry.id = next_entry_id();
    }
    if entry.data.timestamp.is_none() {
        entry.data.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    entry
}

fn next_entry_id() -> String {
    let seq = ENTRY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("e_{}_{seq}", Utc::now().timestamp_millis())
}

fn validate_user(user: &str) -> Result<String, AppError> {
    let user = user.trim();
    if user.is_empty() {
        return Err(AppError::bad_request("user must not be empty"));
    }
    Ok(user.to_string())
}

fn validate_habits(habits: &[HabitConfig]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for habit in habits {
        if habit.id.trim().is_empty() {
            return Err(AppError::bad_request("habit id must not be empty"));
        }
        if !seen.insert(habit.id.as_str()) {
            return Err(AppError::bad_request(format!("duplicate habit id '{}'", habit.id)));
        }
    }
    Ok(())
}

fn parse_bound(raw: Option<&str>, fallback: DateKey) -> Result<DateKey, AppError> {
    match raw {
        Some(raw) => Ok(DateKey::parse(raw.trim())?),
        None => Ok(fallback),
    }
}
