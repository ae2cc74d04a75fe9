use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;
use super::time::{duration_minutes, effective_end, TimeOfDay, Weekday};

/// A contiguous span on one weekday. When `end <= start` the span runs past
/// midnight and ends at `end + 1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub day: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { day, start, end }
    }

    /// Like `new`, but refuses `start == end`.
    pub fn checked(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Result<Self, ScheduleError> {
        if start == end {
            return Err(ScheduleError::DegenerateInterval(start));
        }
        Ok(Self::new(day, start, end))
    }

    pub fn start_min(&self) -> u32 {
        self.start.minutes()
    }

    pub fn effective_end_min(&self) -> u32 {
        effective_end(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> u32 {
        duration_minutes(self.start, self.end)
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains_minute(&self, minute: u32) -> bool {
        minute >= self.start_min() && minute < self.effective_end_min()
    }

    pub fn same_span(&self, other: &Interval) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// Regular recurring hours vs. extra hours. Only regular hours count toward
/// the weekly total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShiftKind {
    #[default]
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "special")]
    Overtime,
}

impl ShiftKind {
    pub fn label(self) -> &'static str {
        match self {
            ShiftKind::Regular => "Recurring",
            ShiftKind::Overtime => "Extra hours",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Saved,
    Draft,
}

/// Local handle for a draft shift; draft shifts have no backend id yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftId(pub u64);

/// Optional date bounds of a recurring shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Validity {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Validity {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ScheduleError> {
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(ScheduleError::InvertedRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// One occurrence of a shift in the displayed week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    /// Backend id for saved shifts.
    pub id: Option<String>,
    pub draft_id: Option<DraftId>,
    pub date: NaiveDate,
    pub interval: Interval,
    pub validity: Validity,
    pub kind: ShiftKind,
    pub source: Source,
}

impl Shift {
    pub fn saved(id: Option<String>, date: NaiveDate, start: TimeOfDay, end: TimeOfDay, kind: ShiftKind) -> Self {
        Self {
            id,
            draft_id: None,
            date,
            interval: Interval::new(Weekday::of(date), start, end),
            validity: Validity::default(),
            kind,
            source: Source::Saved,
        }
    }

    pub fn draft(
        draft_id: DraftId,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        kind: ShiftKind,
        validity: Validity,
    ) -> Self {
        Self {
            id: None,
            draft_id: Some(draft_id),
            date,
            interval: Interval::new(Weekday::of(date), start, end),
            validity,
            kind,
            source: Source::Draft,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.source == Source::Draft
    }

    pub fn weekday(&self) -> Weekday {
        self.interval.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.interval.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.interval.end
    }
}

/// An absolute calendar day on which the employee is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VacationDay {
    pub date: NaiveDate,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionMode {
    OnlyThisBlock,
    FromThisDayOn,
}

impl ExceptionMode {
    pub fn label(self) -> &'static str {
        match self {
            ExceptionMode::OnlyThisBlock => "Only this day",
            ExceptionMode::FromThisDayOn => "This day and all following",
        }
    }

    pub fn is_bulk(self) -> bool {
        !matches!(self, ExceptionMode::OnlyThisBlock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionKind {
    #[default]
    ModifiedShift,
}

/// A pending scoped removal of a saved shift occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftException {
    pub kind: ExceptionKind,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub mode: ExceptionMode,
}

impl ShiftException {
    pub fn for_shift(shift: &Shift, mode: ExceptionMode) -> Self {
        Self {
            kind: ExceptionKind::ModifiedShift,
            date: shift.date,
            start: shift.start(),
            end: shift.end(),
            mode,
        }
    }

    /// Whether this exception removes the given saved occurrence.
    pub fn hides(&self, shift: &Shift) -> bool {
        if shift.start() != self.start || shift.end() != self.end {
            return false;
        }
        match self.mode {
            ExceptionMode::OnlyThisBlock => shift.date == self.date,
            ExceptionMode::FromThisDayOn => {
                shift.date >= self.date && shift.weekday() == Weekday::of(self.date)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacationScope {
    Single,
    Forward,
}

impl VacationScope {
    pub fn label(self) -> &'static str {
        match self {
            VacationScope::Single => "Only this day",
            VacationScope::Forward => "This day and all following",
        }
    }
}

/// A pending removal of a saved vacation day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VacationRemoval {
    pub date: NaiveDate,
    pub scope: VacationScope,
}

impl VacationRemoval {
    pub fn hides(&self, date: NaiveDate) -> bool {
        match self.scope {
            VacationScope::Single => date == self.date,
            VacationScope::Forward => date >= self.date,
        }
    }
}
