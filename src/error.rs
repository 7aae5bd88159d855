use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("invalid calendar date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("unknown weekday `{0}`")]
    InvalidWeekday(String),
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTime(String),
}

/// An event whose fields do not match its `is_recurring` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEvent {
    #[error("event {id} is not recurring but has no date")]
    MissingDate { id: String },
    #[error("event {id} has an invalid date `{value}`")]
    InvalidDate { id: String, value: String },
    #[error("event {id} has an invalid end date `{value}`")]
    InvalidEndDate { id: String, value: String },
    #[error("event {id} ends ({end_date}) before it starts ({date})")]
    EndBeforeStart {
        id: String,
        date: String,
        end_date: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Malformed(#[from] MalformedEvent),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Db(e) => {
                tracing::error!(error = ?e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "erro no servidor".to_string())
            }
            AppError::Malformed(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Date(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, error_message).into_response()
    }
}
