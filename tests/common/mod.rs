//! In-memory schedule backend for driving the commit protocol.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use shiftbox::api::ApiError;
use shiftbox::schedule::{
    NewShift, SavedWeek, ScheduleApi, ScheduleStatus, Shift, ShiftException, ShiftKind,
    TimeOfDay, VacationRemoval, VacationScope, Week, Weekday,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(NaiveDate),
    CreateDraft,
    Exceptions(Vec<ShiftException>),
    CreateShift(NewShift),
    RemoveVacation(VacationRemoval),
    AddVacation(NaiveDate),
    Confirm(String),
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::Fetch(_) => "fetch",
            Call::CreateDraft => "create_draft",
            Call::Exceptions(_) => "exceptions",
            Call::CreateShift(_) => "create_shift",
            Call::RemoveVacation(_) => "remove_vacation",
            Call::AddVacation(_) => "add_vacation",
            Call::Confirm(_) => "confirm",
        }
    }
}

#[derive(Default)]
struct Stored {
    schedule_id: Option<String>,
    confirmed: bool,
    shifts: Vec<NewShift>,
    exceptions: Vec<ShiftException>,
    vacations: Vec<NaiveDate>,
}

/// Records every call in order and keeps what was posted so a later fetch
/// returns it, expanded into the requested week.
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    stored: Mutex<Stored>,
    fail_on: Mutex<Option<&'static str>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an existing record with recurring shifts and vacation days.
    pub fn with_record(id: &str, shifts: Vec<NewShift>, vacations: Vec<NaiveDate>) -> Self {
        let backend = Self::default();
        {
            let mut stored = backend.stored.lock().unwrap();
            stored.schedule_id = Some(id.to_string());
            stored.confirmed = true;
            stored.shifts = shifts;
            stored.vacations = vacations;
        }
        backend
    }

    /// Makes the first call named `step` fail with a 400.
    pub fn fail_on(&self, step: &'static str) {
        *self.fail_on.lock().unwrap() = Some(step);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        let mut fail_on = self.fail_on.lock().unwrap();
        if *fail_on == Some(name) {
            *fail_on = None;
            return Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: format!("{name} rejected"),
            });
        }
        Ok(())
    }

    fn expand(stored: &Stored, week: Week) -> SavedWeek {
        let mut shifts = Vec::new();
        for posted in &stored.shifts {
            let date = week.date_of(posted.weekday);
            if !posted.validity.covers(date) {
                continue;
            }
            let occurrence = Shift::saved(None, date, posted.start, posted.end, posted.kind);
            if stored.exceptions.iter().any(|e| e.hides(&occurrence)) {
                continue;
            }
            shifts.push(occurrence);
        }
        SavedWeek {
            schedule_id: stored.schedule_id.clone(),
            status: Some(if stored.confirmed {
                ScheduleStatus::Confirmed
            } else {
                ScheduleStatus::Draft
            }),
            shifts,
            vacations: stored.vacations.iter().copied().filter(|d| week.contains(*d)).collect(),
        }
    }
}

#[async_trait]
impl ScheduleApi for FakeBackend {
    async fn fetch_week(&self, week_start: NaiveDate) -> Result<Option<SavedWeek>, ApiError> {
        self.record(Call::Fetch(week_start))?;
        let stored = self.stored.lock().unwrap();
        if stored.schedule_id.is_none() {
            return Ok(None);
        }
        Ok(Some(Self::expand(&stored, Week::containing(week_start))))
    }

    async fn create_draft(&self) -> Result<String, ApiError> {
        self.record(Call::CreateDraft)?;
        let mut stored = self.stored.lock().unwrap();
        let id = "1001".to_string();
        stored.schedule_id = Some(id.clone());
        stored.confirmed = false;
        Ok(id)
    }

    async fn create_shift(&self, _schedule_id: &str, shift: &NewShift) -> Result<(), ApiError> {
        self.record(Call::CreateShift(shift.clone()))?;
        self.stored.lock().unwrap().shifts.push(shift.clone());
        Ok(())
    }

    async fn submit_exceptions(&self, _schedule_id: &str, exceptions: &[ShiftException]) -> Result<(), ApiError> {
        self.record(Call::Exceptions(exceptions.to_vec()))?;
        self.stored.lock().unwrap().exceptions.extend_from_slice(exceptions);
        Ok(())
    }

    async fn add_vacation(&self, _schedule_id: &str, date: NaiveDate) -> Result<(), ApiError> {
        self.record(Call::AddVacation(date))?;
        self.stored.lock().unwrap().vacations.push(date);
        Ok(())
    }

    async fn remove_vacation(&self, _schedule_id: &str, removal: &VacationRemoval) -> Result<(), ApiError> {
        self.record(Call::RemoveVacation(*removal))?;
        let mut stored = self.stored.lock().unwrap();
        stored.vacations.retain(|d| match removal.scope {
            VacationScope::Single => *d != removal.date,
            VacationScope::Forward => *d < removal.date,
        });
        Ok(())
    }

    async fn confirm(&self, schedule_id: &str) -> Result<(), ApiError> {
        self.record(Call::Confirm(schedule_id.to_string()))?;
        self.stored.lock().unwrap().confirmed = true;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn t(text: &str) -> TimeOfDay {
    TimeOfDay::parse(text).unwrap()
}

pub fn recurring(weekday: Weekday, start: &str, end: &str) -> NewShift {
    NewShift {
        weekday,
        start: t(start),
        end: t(end),
        kind: ShiftKind::Regular,
        validity: Default::default(),
    }
}

/// Monday 2026-02-09 .. Sunday 2026-02-15.
pub fn sample_week() -> Week {
    Week::containing(date(2026, 2, 9))
}
