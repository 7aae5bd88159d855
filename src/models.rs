use crate::date::{CalendarDate, ClockTime, DayOfWeek};
use crate::error::MalformedEvent;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

/// An event row as it sits in the `events` table, nullable fields and all.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub is_recurring: bool,
    pub date: Option<String>,
    pub end_date: Option<String>,
    pub recurrence_day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub recurrence_day: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EventPayload {
    /// Blank form inputs become NULL. The date columns of a recurring event
    /// are dropped, as are the weekday of a dated one.
    pub fn into_record(self, id: String) -> EventRecord {
        let (date, end_date, recurrence_day) = if self.is_recurring {
            (None, None, non_empty(self.recurrence_day))
        } else {
            (non_empty(self.date), non_empty(self.end_date), None)
        };
        EventRecord {
            id,
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            event_type: non_empty(self.event_type),
            is_recurring: self.is_recurring,
            date,
            end_date,
            recurrence_day,
            start_time: non_empty(self.start_time),
            end_time: non_empty(self.end_time),
            location: non_empty(self.location),
            is_active: self.is_active,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    Once {
        date: CalendarDate,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_date: Option<CalendarDate>,
    },
    /// `None` when the stored weekday is missing or unrecognised.
    Weekly { recurrence_day: Option<DayOfWeek> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub location: Option<String>,
    pub is_active: bool,
}

impl Event {
    pub fn is_recurring(&self) -> bool {
        matches!(self.schedule, Schedule::Weekly { .. })
    }

    /// Last day of a dated event: `end_date` if set, else `date`.
    pub fn effective_end(&self) -> Option<CalendarDate> {
        match self.schedule {
            Schedule::Once { date, end_date } => Some(end_date.unwrap_or(date)),
            Schedule::Weekly { .. } => None,
        }
    }

    pub fn occurs_on(&self, day: CalendarDate) -> bool {
        match self.schedule {
            Schedule::Once { date, end_date } => date <= day && day <= end_date.unwrap_or(date),
            Schedule::Weekly { recurrence_day } => recurrence_day == Some(day.day_of_week()),
        }
    }
}

fn optional_time(id: &str, field: &str, value: Option<&String>) -> Option<ClockTime> {
    let raw = value.map(|v| v.trim()).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(time) => Some(time),
        Err(_) => {
            warn!(event_id = id, field, value = raw, "ignoring unparsable event time");
            None
        }
    }
}

impl TryFrom<&EventRecord> for Event {
    type Error = MalformedEvent;

    fn try_from(record: &EventRecord) -> Result<Self, Self::Error> {
        let id = &record.id;
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let schedule = if record.is_recurring {
            let recurrence_day = text(&record.recurrence_day).and_then(|raw| match raw.parse::<DayOfWeek>() {
                Ok(day) => Some(day),
                Err(_) => {
                    warn!(event_id = %id, value = %raw, "unrecognised recurrence day");
                    None
                }
            });
            Schedule::Weekly { recurrence_day }
        } else {
            let raw_date = text(&record.date).ok_or_else(|| MalformedEvent::MissingDate { id: id.clone() })?;
            let date: CalendarDate = raw_date.parse().map_err(|_| MalformedEvent::InvalidDate {
                id: id.clone(),
                value: raw_date.clone(),
            })?;
            let end_date = match text(&record.end_date) {
                Some(raw) => Some(raw.parse::<CalendarDate>().map_err(|_| {
                    MalformedEvent::InvalidEndDate {
                        id: id.clone(),
                        value: raw.clone(),
                    }
                })?),
                None => None,
            };
            if let Some(end) = end_date {
                if end < date {
                    return Err(MalformedEvent::EndBeforeStart {
                        id: id.clone(),
                        date: date.to_string(),
                        end_date: end.to_string(),
                    });
                }
            }
            Schedule::Once { date, end_date }
        };

        Ok(Event {
            id: id.clone(),
            title: record.title.clone(),
            description: text(&record.description),
            event_type: text(&record.event_type),
            schedule,
            start_time: optional_time(id, "start_time", record.start_time.as_ref()),
            end_time: optional_time(id, "end_time", record.end_time.as_ref()),
            location: text(&record.location),
            is_active: record.is_active,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn once(id: &str, date: &str, end_date: Option<&str>) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: format!("evento {id}"),
            description: None,
            event_type: Some("evento".to_string()),
            is_recurring: false,
            date: Some(date.to_string()),
            end_date: end_date.map(str::to_string),
            recurrence_day: None,
            start_time: Some("19:30:00".to_string()),
            end_time: None,
            location: None,
            is_active: true,
            created_at: None,
        }
    }

    pub(crate) fn weekly(id: &str, day: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            title: format!("culto {id}"),
            event_type: Some("culto".to_string()),
            is_recurring: true,
            date: None,
            recurrence_day: Some(day.to_string()),
            ..once(id, "2000-01-01", None)
        }
    }

    #[test]
    fn one_off_without_date_is_malformed() {
        let mut record = once("a1", "2025-06-10", None);
        record.date = None;
        assert_eq!(
            Event::try_from(&record),
            Err(MalformedEvent::MissingDate { id: "a1".to_string() })
        );

        record.date = Some("   ".to_string());
        assert!(matches!(Event::try_from(&record), Err(MalformedEvent::MissingDate { .. })));
    }

    #[test]
    fn bad_dates_are_malformed() {
        let record = once("a1", "10/06/2025", None);
        assert!(matches!(Event::try_from(&record), Err(MalformedEvent::InvalidDate { .. })));

        let record = once("a1", "2025-06-10", Some("junho"));
        assert!(matches!(Event::try_from(&record), Err(MalformedEvent::InvalidEndDate { .. })));

        let record = once("a1", "2025-06-10", Some("2025-06-09"));
        assert!(matches!(Event::try_from(&record), Err(MalformedEvent::EndBeforeStart { .. })));
    }

    #[test]
    fn recurring_ignores_dates() {
        let mut record = weekly("w1", "sunday");
        record.date = Some("not a date".to_string());
        let event = Event::try_from(&record).unwrap();
        assert_eq!(
            event.schedule,
            Schedule::Weekly { recurrence_day: Some(DayOfWeek::Sunday) }
        );
        assert_eq!(event.effective_end(), None);
    }

    #[test]
    fn unknown_weekday_is_kept_without_a_day() {
        let event = Event::try_from(&weekly("w1", "domingo")).unwrap();
        assert_eq!(event.schedule, Schedule::Weekly { recurrence_day: None });
    }

    #[test]
    fn blank_optionals_are_absent() {
        let mut record = once("a1", "2025-06-10", Some(""));
        record.location = Some(String::new());
        record.end_time = Some("tarde".to_string());
        let event = Event::try_from(&record).unwrap();
        assert_eq!(event.effective_end(), "2025-06-10".parse().ok());
        assert_eq!(event.location, None);
        assert_eq!(event.end_time, None);
        assert_eq!(event.start_time.map(|t| t.to_string()).as_deref(), Some("19:30"));
    }

    #[test]
    fn payload_drops_fields_of_the_other_shape() {
        let payload: EventPayload = serde_json::from_value(serde_json::json!({
            "title": " Culto de Domingo ",
            "is_recurring": true,
            "recurrence_day": "sunday",
            "date": "2025-06-01",
            "end_date": "",
            "location": ""
        }))
        .unwrap();
        let record = payload.into_record("id1".to_string());
        assert_eq!(record.title, "Culto de Domingo");
        assert_eq!(record.date, None);
        assert_eq!(record.recurrence_day.as_deref(), Some("sunday"));
        assert_eq!(record.location, None);
        assert!(record.is_active);
    }
}
