//! Agenda ordering and calendar membership for dated and weekly events.
//!
//! Everything here is pure: the caller passes "today" in, and dates are
//! compared as calendar dates only.

use crate::date::{CalendarDate, DayOfWeek};
use crate::error::{DateError, MalformedEvent};
use crate::models::{Event, EventRecord, Schedule};
use serde::Serialize;

/// Validates `records` and returns the agenda for `today`.
///
/// Fails on the first record whose fields do not match its `is_recurring`
/// shape, inactive ones included.
pub fn resolve_upcoming(records: &[EventRecord], today: CalendarDate) -> Result<Vec<Event>, MalformedEvent> {
    let events = records
        .iter()
        .map(Event::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(upcoming(events, today))
}

/// Active weekly events by weekday, then active dated events that have not
/// ended before `today`, by start date. Ties keep their input order.
pub fn upcoming(events: impl IntoIterator<Item = Event>, today: CalendarDate) -> Vec<Event> {
    let mut list: Vec<Event> = events
        .into_iter()
        .filter(|event| event.is_active && !has_ended(event, today))
        .collect();
    list.sort_by_key(agenda_key);
    list
}

fn has_ended(event: &Event, today: CalendarDate) -> bool {
    event.effective_end().is_some_and(|end| end < today)
}

/// Weekly events first (unknown weekday last among them), then dated ones.
fn agenda_key(event: &Event) -> (u8, u32, Option<CalendarDate>) {
    match event.schedule {
        Schedule::Weekly { recurrence_day } => (0, recurrence_day.map_or(u32::MAX, DayOfWeek::index), None),
        Schedule::Once { date, .. } => (1, 0, Some(date)),
    }
}

pub fn has_event_on_day(events: &[Event], day: CalendarDate) -> bool {
    events.iter().any(|event| event.is_active && event.occurs_on(day))
}

/// Active events taking place on `day`, in agenda order.
pub fn events_on_day(events: &[Event], day: CalendarDate) -> Vec<&Event> {
    let mut list: Vec<&Event> = events
        .iter()
        .filter(|event| event.is_active && event.occurs_on(day))
        .collect();
    list.sort_by_key(|event| agenda_key(event));
    list
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: CalendarDate,
    pub weekday: DayOfWeek,
    pub has_event: bool,
}

/// One cell per day of the month, with the marker a calendar grid needs.
pub fn calendar_month(events: &[Event], year: i32, month: u32) -> Result<Vec<CalendarDay>, DateError> {
    Ok(CalendarDate::month_days(year, month)?
        .into_iter()
        .map(|date| CalendarDay {
            date,
            weekday: date.day_of_week(),
            has_event: has_event_on_day(events, date),
        })
        .collect())
}
