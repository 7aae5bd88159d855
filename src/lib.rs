pub mod clock;
pub mod config;
pub mod date;
pub mod db;
pub mod display;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schedule;
pub mod state;

use axum::{
    Router,
    routing::{get, patch},
};
use state::AppState;
use tower_http::trace::TraceLayer;

/// The JSON API. Static files are mounted by the binary.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event_handler),
        )
        .route(
            "/api/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event_handler)
                .delete(handlers::delete_event_handler),
        )
        .route("/api/events/{id}/active", patch(handlers::set_active_handler))
        .route("/api/agenda", get(handlers::get_agenda))
        .route("/api/calendar/{year}/{month}", get(handlers::get_calendar_month))
        .route("/api/calendar/day/{date}", get(handlers::get_calendar_day))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
