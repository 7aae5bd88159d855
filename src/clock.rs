use crate::date::CalendarDate;
use chrono::Local;

/// Source of "today" for the agenda.
pub trait Clock: Send + Sync {
    fn today(&self) -> CalendarDate;
}

/// The host's wall-clock date in its local zone. A UTC date would flip to
/// tomorrow during the evening west of Greenwich.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::from(Local::now().date_naive())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
