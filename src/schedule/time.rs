//! Wall-clock time and weekday primitives for the weekly grid.
//!
//! Times are minutes since midnight and carry no timezone. A span whose end is
//! not after its start crosses midnight and ends on the following day.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time, `HH:MM`, stored as minutes in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Wraps `minutes` into the day before building the time.
    pub fn from_minutes(minutes: u32) -> Self {
        TimeOfDay((minutes % MINUTES_PER_DAY) as u16)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay((hour * 60 + minute) as u16))
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    /// Strict `HH:MM` (24-hour) parser used for wire values.
    pub fn parse(text: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidTime(text.to_string());
        let (h, m) = text.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour = h.parse::<u32>().map_err(|_| invalid())?;
        let minute = m.parse::<u32>().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    /// Lenient parser for what people type into the form: "9", "9:30",
    /// "14:05", "2pm", "12:30am".
    pub fn parse_input(input: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidTime(input.trim().to_string());
        let lowered = input.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(ScheduleError::MissingField("time"));
        }

        let (time_part, meridiem) = if let Some(rest) = lowered.strip_suffix("pm") {
            (rest, Some(true))
        } else if let Some(rest) = lowered.strip_suffix("am") {
            (rest, Some(false))
        } else if let Some(rest) = lowered.strip_suffix('p') {
            (rest, Some(true))
        } else if let Some(rest) = lowered.strip_suffix('a') {
            (rest, Some(false))
        } else {
            (lowered.as_str(), None)
        };
        let time_part = time_part.trim();

        let (hour, minute) = match time_part.split_once(':') {
            Some((h, m)) => (
                h.parse::<u32>().map_err(|_| invalid())?,
                m.parse::<u32>().map_err(|_| invalid())?,
            ),
            None => (time_part.parse::<u32>().map_err(|_| invalid())?, 0),
        };

        let hour = match meridiem {
            Some(_) if hour == 0 || hour > 12 => return Err(invalid()),
            Some(true) if hour < 12 => hour + 12,
            Some(false) if hour == 12 => 0,
            _ => hour,
        };

        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    /// 12-hour rendering ("9:05am") for the optional clock format.
    pub fn format_12h(self) -> String {
        let (h12, ampm) = match self.hour() {
            0 => (12, "am"),
            h if h < 12 => (h, "am"),
            12 => (12, "pm"),
            h => (h - 12, "pm"),
        };
        format!("{}:{:02}{}", h12, self.minute(), ampm)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// `"HH:MM"` to minutes since midnight.
pub fn time_to_minutes(text: &str) -> Result<u32, ScheduleError> {
    TimeOfDay::parse(text).map(TimeOfDay::minutes)
}

/// Minutes to `"HH:MM"`, wrapping past midnight (1440 renders as `00:00`).
pub fn minutes_to_time(minutes: u32) -> String {
    TimeOfDay::from_minutes(minutes).to_string()
}

/// End of the span in minutes, pushed to the next day when it does not come
/// after `start`.
pub fn effective_end(start: TimeOfDay, end: TimeOfDay) -> u32 {
    if end > start {
        end.minutes()
    } else {
        end.minutes() + MINUTES_PER_DAY
    }
}

pub fn duration_minutes(start: TimeOfDay, end: TimeOfDay) -> u32 {
    effective_end(start, end) - start.minutes()
}

/// Column of the weekly grid, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Zero-based column index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// ISO number, Monday = 1 .. Sunday = 7. This is the wire encoding.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get((number as usize).checked_sub(1)?).copied()
    }

    /// Single-letter grid header: L M X J V S D.
    pub fn symbol(self) -> char {
        match self {
            Weekday::Mon => 'L',
            Weekday::Tue => 'M',
            Weekday::Wed => 'X',
            Weekday::Thu => 'J',
            Weekday::Fri => 'V',
            Weekday::Sat => 'S',
            Weekday::Sun => 'D',
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::ALL[date.weekday().num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(ScheduleError::InvalidWeekday(value))
    }
}

impl From<Weekday> for u8 {
    fn from(value: Weekday) -> Self {
        value.number()
    }
}
