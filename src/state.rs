use crate::config::AppConfig;
use crate::models::{AppData, HabitConfig, LogEntry, default_habits};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub default_user: String,
    pub data: Arc<Mutex<AppData>>,
}

/// A user's entries and habit list as they stood when captured.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entries: Arc<Vec<LogEntry>>,
    pub habits: Vec<HabitConfig>,
}

impl AppState {
    pub fn new(config: &AppConfig, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            default_user: config.default_user.clone(),
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Captures the current snapshot for `user` so computation can run without the lock.
    pub async fn snapshot(&self, user: &str) -> Snapshot {
        let data = self.data.lock().await;
        match data.users.get(user) {
            Some(user) => Snapshot {
                entries: Arc::clone(&user.entries),
                habits: user.configured_habits(),
            },
            None => Snapshot {
                entries: Arc::default(),
                habits: default_habits(),
            },
        }
    }
}
