use crate::error::AppError;
use crate::models::{EventPayload, EventRecord};
use nanoid::nanoid;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            event_type TEXT,
            is_recurring BOOLEAN NOT NULL DEFAULT 0,
            date TEXT,
            end_date TEXT,
            recurrence_day TEXT,
            start_time TEXT,
            end_time TEXT,
            location TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        );",
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub is_active: Option<bool>,
    pub event_type: Option<String>,
}

/// Advisory sort for listings, written `date` or `-date` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderHint {
    column: &'static str,
    descending: bool,
}

impl OrderHint {
    /// Unknown columns fall back to `date`.
    pub fn parse(hint: &str) -> Self {
        let (descending, name) = match hint.trim().strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, hint.trim()),
        };
        let column = match name {
            "title" => "title",
            "created_at" => "created_at",
            _ => "date",
        };
        OrderHint { column, descending }
    }
}

impl Default for OrderHint {
    fn default() -> Self {
        OrderHint {
            column: "date",
            descending: false,
        }
    }
}

pub async fn list_events(
    pool: &SqlitePool,
    filter: &EventFilter,
    order: OrderHint,
    limit: Option<i64>,
) -> Result<Vec<EventRecord>, AppError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM events WHERE 1 = 1");
    if let Some(active) = filter.is_active {
        query.push(" AND is_active = ").push_bind(active);
    }
    if let Some(event_type) = &filter.event_type {
        query.push(" AND event_type = ").push_bind(event_type.clone());
    }
    query
        .push(" ORDER BY ")
        .push(order.column)
        .push(if order.descending { " DESC" } else { " ASC" })
        .push(", created_at ASC");
    if let Some(limit) = limit {
        query.push(" LIMIT ").push_bind(limit);
    }
    query
        .build_query_as::<EventRecord>()
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find_event(pool: &SqlitePool, id: &str) -> Result<Option<EventRecord>, AppError> {
    sqlx::query_as("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

pub async fn count_events(pool: &SqlitePool) -> Result<i64, AppError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events").fetch_one(pool).await?;
    Ok(count.0)
}

/// Stores a new event under a fresh id. The payload is not validated here.
pub async fn create_event(pool: &SqlitePool, payload: EventPayload) -> Result<EventRecord, AppError> {
    let record = payload.into_record(nanoid!(10));
    let event = sqlx::query_as(
        "INSERT INTO events (id, title, description, event_type, is_recurring, date, end_date,
            recurrence_day, start_time, end_time, location, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.event_type)
    .bind(record.is_recurring)
    .bind(&record.date)
    .bind(&record.end_date)
    .bind(&record.recurrence_day)
    .bind(&record.start_time)
    .bind(&record.end_time)
    .bind(&record.location)
    .bind(record.is_active)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Replaces every editable column. `None` if the id is unknown.
pub async fn update_event(
    pool: &SqlitePool,
    id: &str,
    payload: EventPayload,
) -> Result<Option<EventRecord>, AppError> {
    let record = payload.into_record(id.to_string());
    sqlx::query_as(
        "UPDATE events SET title = ?, description = ?, event_type = ?, is_recurring = ?, date = ?,
            end_date = ?, recurrence_day = ?, start_time = ?, end_time = ?, location = ?, is_active = ?
         WHERE id = ? RETURNING *",
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.event_type)
    .bind(record.is_recurring)
    .bind(&record.date)
    .bind(&record.end_date)
    .bind(&record.recurrence_day)
    .bind(&record.start_time)
    .bind(&record.end_time)
    .bind(&record.location)
    .bind(record.is_active)
    .bind(&record.id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)
}

pub async fn set_event_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
) -> Result<Option<EventRecord>, AppError> {
    sqlx::query_as("UPDATE events SET is_active = ? WHERE id = ? RETURNING *")
        .bind(is_active)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

/// `false` if there was nothing to delete.
pub async fn delete_event(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    fn payload(value: serde_json::Value) -> EventPayload {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn create_find_update_delete() {
        let pool = pool().await;
        let created = create_event(
            &pool,
            payload(serde_json::json!({
                "title": "Vigília",
                "date": "2025-07-04",
                "end_date": "",
                "start_time": "22:00"
            })),
        )
        .await
        .unwrap();
        assert_eq!(created.id.len(), 10);
        assert_eq!(created.end_date, None);
        assert!(created.is_active);
        assert!(created.created_at.is_some());

        let found = find_event(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Vigília");

        let updated = update_event(
            &pool,
            &created.id,
            payload(serde_json::json!({ "title": "Culto de Oração", "is_recurring": true, "recurrence_day": "wednesday" })),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(updated.is_recurring);
        assert_eq!(updated.date, None);
        assert_eq!(updated.recurrence_day.as_deref(), Some("wednesday"));

        let hidden = set_event_active(&pool, &created.id, false).await.unwrap().unwrap();
        assert!(!hidden.is_active);

        assert!(delete_event(&pool, &created.id).await.unwrap());
        assert!(!delete_event(&pool, &created.id).await.unwrap());
        assert_eq!(find_event(&pool, &created.id).await.unwrap(), None);
        assert!(update_event(&pool, "missing", payload(serde_json::json!({ "title": "x" })))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn list_filters_orders_and_limits() {
        let pool = pool().await;
        for (title, date, kind, active) in [
            ("b", "2025-08-01", "culto", true),
            ("a", "2025-07-01", "reuniao", true),
            ("c", "2025-09-01", "culto", false),
        ] {
            create_event(
                &pool,
                payload(serde_json::json!({ "title": title, "date": date, "event_type": kind, "is_active": active })),
            )
            .await
            .unwrap();
        }

        let titles = |records: Vec<EventRecord>| records.into_iter().map(|r| r.title).collect::<Vec<_>>();

        let all = list_events(&pool, &EventFilter::default(), OrderHint::default(), None).await.unwrap();
        assert_eq!(titles(all), ["a", "b", "c"]);

        let newest_first = list_events(&pool, &EventFilter::default(), OrderHint::parse("-date"), Some(2))
            .await
            .unwrap();
        assert_eq!(titles(newest_first), ["c", "b"]);

        let active_cultos = EventFilter {
            is_active: Some(true),
            event_type: Some("culto".to_string()),
        };
        let filtered = list_events(&pool, &active_cultos, OrderHint::default(), None).await.unwrap();
        assert_eq!(titles(filtered), ["b"]);

        assert_eq!(count_events(&pool).await.unwrap(), 3);
    }

    #[test]
    fn order_hint_whitelists_columns() {
        assert_eq!(OrderHint::parse("-title"), OrderHint { column: "title", descending: true });
        assert_eq!(OrderHint::parse("date; DROP TABLE events"), OrderHint::default());
    }
}
