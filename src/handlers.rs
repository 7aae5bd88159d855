use crate::{
    date::{CalendarDate, DayOfWeek},
    db::{self, EventFilter, OrderHint},
    display::{self, DisplayDateInfo},
    error::AppError,
    models::{Event, EventPayload, EventRecord},
    schedule::{self, CalendarDay},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

fn event_not_found() -> AppError {
    AppError::NotFound("evento não encontrado".to_string())
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    active: Option<bool>,
    event_type: Option<String>,
    order: Option<String>,
    limit: Option<i64>,
}

pub async fn list_events(
    State(app_state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<EventRecord>>, AppError> {
    let filter = EventFilter {
        is_active: params.active,
        event_type: params.event_type,
    };
    let order = params.order.as_deref().map(OrderHint::parse).unwrap_or_default();
    db::list_events(&app_state.pool, &filter, order, params.limit)
        .await
        .map(Json)
}

pub async fn get_event(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventRecord>, AppError> {
    db::find_event(&app_state.pool, &id)
        .await?
        .map(Json)
        .ok_or_else(event_not_found)
}

/// Malformed payloads are rejected before they reach the table.
fn validate(payload: &EventPayload) -> Result<(), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("o título é obrigatório".to_string()));
    }
    Event::try_from(&payload.clone().into_record(String::new()))?;
    Ok(())
}

pub async fn create_event_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<(StatusCode, Json<EventRecord>), AppError> {
    validate(&payload)?;
    let new_event = db::create_event(&app_state.pool, payload).await?;
    info!(event_id = %new_event.id, title = %new_event.title, "event created");
    Ok((StatusCode::CREATED, Json(new_event)))
}

pub async fn update_event_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<EventRecord>, AppError> {
    validate(&payload)?;
    let updated = db::update_event(&app_state.pool, &id, payload)
        .await?
        .ok_or_else(event_not_found)?;
    info!(event_id = %id, "event updated");
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct ActivePayload {
    is_active: bool,
}

pub async fn set_active_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ActivePayload>,
) -> Result<Json<EventRecord>, AppError> {
    let updated = db::set_event_active(&app_state.pool, &id, payload.is_active)
        .await?
        .ok_or_else(event_not_found)?;
    info!(event_id = %id, is_active = payload.is_active, "event visibility changed");
    Ok(Json(updated))
}

pub async fn delete_event_handler(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_event(&app_state.pool, &id).await? {
        return Err(event_not_found());
    }
    info!(event_id = %id, "event deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct AgendaEntry {
    event: Event,
    when: DisplayDateInfo,
    time: Option<String>,
    /// "Hoje" / "Amanhã" / dd/MM, dated events only.
    day_label: Option<String>,
}

impl AgendaEntry {
    fn new(event: Event, today: CalendarDate) -> Self {
        AgendaEntry {
            when: display::format_event_date(&event),
            time: display::time_label(&event),
            day_label: display::event_day_label(&event, today),
            event,
        }
    }
}

/// Every stored event, inactive ones included, so a malformed row is reported
/// even while hidden. The resolver drops inactive events itself.
async fn all_events(app_state: &AppState) -> Result<Vec<EventRecord>, AppError> {
    db::list_events(&app_state.pool, &EventFilter::default(), OrderHint::default(), None).await
}

/// The caller's local date when given, else the server clock.
fn resolve_today(raw: Option<&str>, app_state: &AppState) -> Result<CalendarDate, AppError> {
    match raw {
        Some(raw) => Ok(raw.parse::<CalendarDate>()?),
        None => Ok(app_state.clock.today()),
    }
}

#[derive(Debug, Deserialize)]
pub struct TodayParams {
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgendaParams {
    /// The caller's local date; the server clock is used when absent.
    today: Option<String>,
    limit: Option<usize>,
}

pub async fn get_agenda(
    State(app_state): State<AppState>,
    Query(params): Query<AgendaParams>,
) -> Result<Json<Vec<AgendaEntry>>, AppError> {
    let today = resolve_today(params.today.as_deref(), &app_state)?;
    let records = all_events(&app_state).await?;
    let agenda = schedule::resolve_upcoming(&records, today)?;
    Ok(Json(
        agenda
            .into_iter()
            .take(params.limit.unwrap_or(usize::MAX))
            .map(|event| AgendaEntry::new(event, today))
            .collect(),
    ))
}

#[derive(Debug, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
    month_name: &'static str,
    days: Vec<CalendarDay>,
}

pub async fn get_calendar_month(
    State(app_state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CalendarMonth>, AppError> {
    let month_name = display::month_name(month)
        .ok_or_else(|| AppError::BadRequest(format!("mês inválido: {month}")))?;
    let events = validated(all_events(&app_state).await?)?;
    let days = schedule::calendar_month(&events, year, month)?;
    Ok(Json(CalendarMonth {
        year,
        month,
        month_name,
        days,
    }))
}

#[derive(Debug, Serialize)]
pub struct CalendarDayDetails {
    date: CalendarDate,
    weekday: DayOfWeek,
    events: Vec<AgendaEntry>,
}

pub async fn get_calendar_day(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
    Query(params): Query<TodayParams>,
) -> Result<Json<CalendarDayDetails>, AppError> {
    let date: CalendarDate = date.parse()?;
    let today = resolve_today(params.today.as_deref(), &app_state)?;
    let events = validated(all_events(&app_state).await?)?;
    let entries = schedule::events_on_day(&events, date)
        .into_iter()
        .map(|event| AgendaEntry::new(event.clone(), today))
        .collect();
    Ok(Json(CalendarDayDetails {
        date,
        weekday: date.day_of_week(),
        events: entries,
    }))
}

fn validated(records: Vec<EventRecord>) -> Result<Vec<Event>, AppError> {
    records
        .iter()
        .map(|record| Event::try_from(record).map_err(AppError::from))
        .collect()
}
