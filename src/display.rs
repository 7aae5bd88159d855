use crate::date::CalendarDate;
use crate::models::{Event, Schedule};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro", "Outubro",
    "Novembro", "Dezembro",
];

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// What an agenda card prints in its date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayDateInfo {
    Dated {
        day: String,
        month: &'static str,
        weekday: &'static str,
        full: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        range: Option<String>,
    },
    Weekly {
        weekday: Option<&'static str>,
        full: String,
    },
}

pub fn format_event_date(event: &Event) -> DisplayDateInfo {
    match event.schedule {
        Schedule::Once { date, end_date } => {
            let day = format!("{:02}", date.day());
            let month = month_name(date.month()).unwrap_or_default();
            let weekday = date.day_of_week().label();
            let range = end_date
                .filter(|end| *end > date)
                .map(|end| format!("{}/{} até {}/{}", date.day(), date.month(), end.day(), end.month()));
            DisplayDateInfo::Dated {
                full: format!("{weekday}, {day} de {month}"),
                day,
                month,
                weekday,
                range,
            }
        }
        Schedule::Weekly { recurrence_day } => {
            let weekday = recurrence_day.map(|d| d.label());
            DisplayDateInfo::Weekly {
                weekday,
                full: weekday.map_or_else(|| "Semanal".to_string(), |w| format!("Todo(a) {w}")),
            }
        }
    }
}

/// "Hoje", "Amanhã" or `dd/MM`.
pub fn day_label(date: CalendarDate, today: CalendarDate) -> String {
    if date == today {
        "Hoje".to_string()
    } else if today.succ() == Some(date) {
        "Amanhã".to_string()
    } else {
        format!("{:02}/{:02}", date.day(), date.month())
    }
}

/// Day label of a dated event. An event already under way counts from today.
pub fn event_day_label(event: &Event, today: CalendarDate) -> Option<String> {
    let Schedule::Once { date, .. } = event.schedule else {
        return None;
    };
    let running = date < today && event.effective_end().is_some_and(|end| end >= today);
    Some(day_label(if running { today } else { date }, today))
}

pub fn time_label(event: &Event) -> Option<String> {
    let start = event.start_time?;
    Some(match event.end_time {
        Some(end) => format!("{start} - {end}"),
        None => start.to_string(),
    })
}
