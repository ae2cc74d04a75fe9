mod gesture_tests;
mod merge_tests;
mod overlap_tests;
mod state_tests;
mod week_tests;

use chrono::NaiveDate;

use super::{Interval, SavedWeek, ScheduleState, Shift, ShiftKind, TimeOfDay, Week, Weekday};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(super) fn t(text: &str) -> TimeOfDay {
    TimeOfDay::parse(text).unwrap()
}

pub(super) fn iv(day: Weekday, start: &str, end: &str) -> Interval {
    Interval::new(day, t(start), t(end))
}

/// Monday 2026-02-09 .. Sunday 2026-02-15.
pub(super) fn sample_week() -> Week {
    Week::containing(date(2026, 2, 9))
}

pub(super) fn sample_saved(date: NaiveDate, start: &str, end: &str) -> Shift {
    Shift::saved(Some(format!("s-{date}-{start}")), date, t(start), t(end), ShiftKind::Regular)
}

pub(super) fn sample_state(shifts: Vec<Shift>, vacations: Vec<NaiveDate>) -> ScheduleState {
    let mut state = ScheduleState::new(sample_week());
    state.replace_saved(SavedWeek {
        schedule_id: Some("42".to_string()),
        status: None,
        shifts,
        vacations,
    });
    state
}
