use chrono::NaiveDate;
use thiserror::Error;

use super::time::{TimeOfDay, Weekday};

/// Rejections raised by editor gestures before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid time: '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid weekday number: {0}")]
    InvalidWeekday(u8),

    #[error("A shift needs different start and end times ({0})")]
    DegenerateInterval(TimeOfDay),

    #[error("The shift overlaps {day} {start}-{end}")]
    Overlap {
        day: Weekday,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("End date {to} is before start date {from}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("A range spans at most {max} days ({days} requested)")]
    RangeTooLong { days: i64, max: i64 },

    #[error("Cannot remove every occurrence from {date}: the date is in the past")]
    PastBulkDelete { date: NaiveDate },

    #[error("Nothing is selected")]
    NoSelection,

    #[error("A save is in progress")]
    Busy,

    #[error("The week has not finished loading")]
    NotLoaded,
}
