use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/users/:user/entries",
            get(handlers::get_entries)
                .put(handlers::replace_entries)
                .post(handlers::add_entry),
        )
        .route("/api/users/:user/entries/:id", delete(handlers::delete_entry))
        .route(
            "/api/users/:user/habits",
            get(handlers::get_habits).put(handlers::put_habits),
        )
        .route("/api/users/:user/records", get(handlers::get_records))
        .route("/api/users/:user/report", get(handlers::get_report))
        .with_state(state)
}
