use agenda::{clock::LocalClock, config::Config, db, models::EventPayload, state::AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn seed_database_if_empty(pool: &SqlitePool) {
    let event_count = db::count_events(pool).await.expect("Failed to check event count");
    if event_count > 0 {
        return;
    }

    info!("database is empty, adding demo events");
    let demo = [
        serde_json::json!({
            "title": "Culto de Celebração",
            "event_type": "culto",
            "is_recurring": true,
            "recurrence_day": "sunday",
            "start_time": "18:00",
            "end_time": "20:00",
            "location": "Igreja Sede"
        }),
        serde_json::json!({
            "title": "Culto de Oração",
            "event_type": "culto",
            "is_recurring": true,
            "recurrence_day": "wednesday",
            "start_time": "19:30"
        }),
        serde_json::json!({
            "title": "Reunião de Líderes",
            "event_type": "reuniao",
            "date": "2099-01-10",
            "start_time": "09:00"
        }),
    ];
    for event in demo {
        let payload: EventPayload = match serde_json::from_value(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "invalid demo event");
                continue;
            }
        };
        match db::create_event(pool, payload).await {
            Ok(created) => info!(event_id = %created.id, title = %created.title, "demo event added"),
            Err(e) => error!(error = %e, "failed to add demo event"),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agenda=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("invalid configuration");

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("failed to parse DATABASE_URL")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .expect("failed to connect to db");

    db::init_schema(&pool).await.expect("failed to create events table");

    if config.seed_demo {
        seed_database_if_empty(&pool).await;
    }

    let app_state = AppState {
        pool,
        clock: Arc::new(LocalClock),
    };

    let app = agenda::router(app_state).fallback_service(ServeDir::new(&config.static_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.expect("failed to bind");
    info!(%addr, static_dir = %config.static_dir.display(), "agenda listening");
    axum::serve(listener, app).await.expect("server error");
}
