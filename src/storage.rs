use crate::errors::AppError;
use crate::models::AppData;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                info!(users = data.users.len(), "loaded data file");
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

/// Writes the whole data set next to `path` and renames it into place, so a
/// reader never sees a half-written file.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogEntry, UserData};
    use std::sync::Arc;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("streak_board_{name}_{}_{nanos}.json", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let data = load_data(&temp_path("missing")).await;
        assert!(data.users.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();
        let data = load_data(&path).await;
        assert!(data.users.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_entries_load_back() {
        let path = temp_path("persist");
        let entry: LogEntry = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "type": "habits",
            "data": { "targetDate": "2026-01-05", "completed": ["water"] }
        }))
        .unwrap();
        let mut data = AppData::default();
        data.users.insert(
            "alice".to_string(),
            UserData {
                entries: Arc::new(vec![entry.clone()]),
                habits: None,
            },
        );

        persist_data(&path, &data).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded.users["alice"].entries.as_slice(), [entry]);
        assert!(!staging_path(&path).exists());
        let _ = fs::remove_file(&path).await;
    }

    #[test]
    fn staging_file_sits_next_to_target() {
        let staging = staging_path(Path::new("data/state.json"));
        assert_eq!(staging, PathBuf::from("data/state.json.tmp"));
    }
}
