use crate::error::DateError;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A year/month/day value with no time of day and no offset.
///
/// Parsing works on the digits of the `YYYY-MM-DD` text, so the day written in
/// the database is the day you get back, whatever zone the host runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from(self.0.weekday())
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Every day of the given month, in order.
    pub fn month_days(year: i32, month: u32) -> Result<Vec<Self>, DateError> {
        let first = Self::from_ymd(year, month, 1).ok_or(DateError::InvalidMonth { year, month })?;
        Ok(first
            .0
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(Self)
            .collect())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DateError::InvalidDate(s.to_string());
        // timestamps coming back from the store carry a `T..` suffix
        let text = s.trim().split('T').next().unwrap_or_default();
        let bytes = text.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        let digits = |range: std::ops::Range<usize>| -> Result<u32, DateError> {
            let part = &text[range];
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let year = digits(0..4)? as i32;
        let month = digits(5..7)?;
        let day = digits(8..10)?;
        Self::from_ymd(year, month, day).ok_or_else(invalid)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Weekday of a recurring event. Declaration order is the agenda order,
/// Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// Sunday = 0 .. Saturday = 6.
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Domingo",
            DayOfWeek::Monday => "Segunda",
            DayOfWeek::Tuesday => "Terça",
            DayOfWeek::Wednesday => "Quarta",
            DayOfWeek::Thursday => "Quinta",
            DayOfWeek::Friday => "Sexta",
            DayOfWeek::Saturday => "Sábado",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(DayOfWeek::Sunday),
            "monday" | "mon" => Ok(DayOfWeek::Monday),
            "tuesday" | "tue" => Ok(DayOfWeek::Tuesday),
            "wednesday" | "wed" => Ok(DayOfWeek::Wednesday),
            "thursday" | "thu" => Ok(DayOfWeek::Thursday),
            "friday" | "fri" => Ok(DayOfWeek::Friday),
            "saturday" | "sat" => Ok(DayOfWeek::Saturday),
            _ => Err(DateError::InvalidWeekday(s.to_string())),
        }
    }
}

/// Hour and minute of an event, shown as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl FromStr for ClockTime {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(ClockTime)
            .map_err(|_| DateError::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
