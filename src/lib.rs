pub mod app;
pub mod config;
pub mod date_key;
pub mod errors;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod podium;
pub mod records;
pub mod report;
pub mod state;
pub mod storage;
pub mod streaks;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use date_key::DateKey;
pub use state::AppState;
pub use storage::load_data;
pub use streaks::{StreakStats, compute_stats, compute_stats_at};
