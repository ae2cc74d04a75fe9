//! Pushes pending changes to the schedule backend.
//!
//! Calls run strictly one after another: the record id must exist before
//! anything is attached to it, and the first failure stops the sequence.
//! Steps that already went through are not compensated.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use super::interval::{Shift, ShiftException, ShiftKind, VacationRemoval, Validity};
use super::state::{SavedWeek, ScheduleState};
use super::time::{TimeOfDay, Weekday};
use super::week::Week;
use crate::api::ApiError;

/// A recurring shift as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    pub weekday: Weekday,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub kind: ShiftKind,
    pub validity: Validity,
}

impl From<&Shift> for NewShift {
    fn from(shift: &Shift) -> Self {
        Self {
            weekday: shift.weekday(),
            start: shift.start(),
            end: shift.end(),
            kind: shift.kind,
            validity: shift.validity,
        }
    }
}

/// The schedule backend, scoped to one employee.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// `None` when the backend has nothing (or nothing readable) for the week.
    async fn fetch_week(&self, week_start: NaiveDate) -> Result<Option<SavedWeek>, ApiError>;

    /// Creates a draft record and returns its id.
    async fn create_draft(&self) -> Result<String, ApiError>;

    async fn create_shift(&self, schedule_id: &str, shift: &NewShift) -> Result<(), ApiError>;

    async fn submit_exceptions(&self, schedule_id: &str, exceptions: &[ShiftException]) -> Result<(), ApiError>;

    async fn add_vacation(&self, schedule_id: &str, date: NaiveDate) -> Result<(), ApiError>;

    async fn remove_vacation(&self, schedule_id: &str, removal: &VacationRemoval) -> Result<(), ApiError>;

    async fn confirm(&self, schedule_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    CreateRecord,
    Exceptions,
    Shift { weekday: Weekday, start: TimeOfDay, end: TimeOfDay },
    RemoveVacation(NaiveDate),
    AddVacation(NaiveDate),
    Confirm,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStep::CreateRecord => write!(f, "creating the schedule"),
            SyncStep::Exceptions => write!(f, "removing shifts"),
            SyncStep::Shift { weekday, start, end } => {
                write!(f, "saving shift {} {}-{}", weekday.short_name(), start, end)
            }
            SyncStep::RemoveVacation(date) => write!(f, "removing vacation {}", date),
            SyncStep::AddVacation(date) => write!(f, "saving vacation {}", date),
            SyncStep::Confirm => write!(f, "confirming the schedule"),
        }
    }
}

#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct SyncError {
    pub step: SyncStep,
    /// Record id known when the failure happened, including one created by
    /// this attempt.
    pub schedule_id: Option<String>,
    #[source]
    pub source: ApiError,
}

/// Snapshot of what a commit will send.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitPlan {
    pub schedule_id: Option<String>,
    pub exceptions: Vec<ShiftException>,
    pub shifts: Vec<NewShift>,
    pub vacations_removed: Vec<VacationRemoval>,
    pub vacations_added: Vec<NaiveDate>,
}

impl CommitPlan {
    pub fn from_state(state: &ScheduleState) -> Self {
        let pending = state.pending();
        Self {
            schedule_id: state.schedule_id().map(str::to_string),
            exceptions: pending.exceptions.clone(),
            shifts: pending.shifts.iter().map(NewShift::from).collect(),
            vacations_removed: pending.vacation_removals.clone(),
            vacations_added: pending.vacations.iter().copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
            && self.shifts.is_empty()
            && self.vacations_removed.is_empty()
            && self.vacations_added.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub schedule_id: Option<String>,
    pub created_record: bool,
    pub exceptions: usize,
    pub shifts: usize,
    pub vacations_removed: usize,
    pub vacations_added: usize,
    pub confirmed: bool,
}

impl CommitReport {
    pub fn changes(&self) -> usize {
        self.shifts + self.vacations_added + self.vacations_removed + usize::from(self.exceptions > 0)
    }
}

/// Sends `plan`: record, exceptions, shifts, vacation removals, vacation
/// additions, then confirm. An empty plan makes no calls.
pub async fn commit(api: &dyn ScheduleApi, plan: &CommitPlan) -> Result<CommitReport, SyncError> {
    let mut report = CommitReport {
        schedule_id: plan.schedule_id.clone(),
        ..CommitReport::default()
    };
    if plan.is_empty() {
        info!("nothing to sync");
        return Ok(report);
    }

    let fail = |step: SyncStep, schedule_id: Option<String>| {
        move |source: ApiError| {
            warn!(%step, error = %source, "sync step failed");
            SyncError {
                step,
                schedule_id,
                source,
            }
        }
    };

    let schedule_id = match &plan.schedule_id {
        Some(id) => id.clone(),
        None => {
            let id = api
                .create_draft()
                .await
                .map_err(fail(SyncStep::CreateRecord, None))?;
            info!(schedule_id = %id, "draft schedule created");
            report.created_record = true;
            report.schedule_id = Some(id.clone());
            id
        }
    };
    let known = || Some(schedule_id.clone());

    if !plan.exceptions.is_empty() {
        api.submit_exceptions(&schedule_id, &plan.exceptions)
            .await
            .map_err(fail(SyncStep::Exceptions, known()))?;
        report.exceptions = plan.exceptions.len();
        info!(count = report.exceptions, "exceptions submitted");
    }

    for shift in &plan.shifts {
        let step = SyncStep::Shift {
            weekday: shift.weekday,
            start: shift.start,
            end: shift.end,
        };
        api.create_shift(&schedule_id, shift)
            .await
            .map_err(fail(step, known()))?;
        report.shifts += 1;
    }
    if report.shifts > 0 {
        info!(count = report.shifts, "shifts submitted");
    }

    for removal in &plan.vacations_removed {
        api.remove_vacation(&schedule_id, removal)
            .await
            .map_err(fail(SyncStep::RemoveVacation(removal.date), known()))?;
        report.vacations_removed += 1;
    }

    for &date in &plan.vacations_added {
        api.add_vacation(&schedule_id, date)
            .await
            .map_err(fail(SyncStep::AddVacation(date), known()))?;
        report.vacations_added += 1;
    }

    if report.changes() > 0 {
        api.confirm(&schedule_id)
            .await
            .map_err(fail(SyncStep::Confirm, known()))?;
        report.confirmed = true;
        info!(schedule_id = %schedule_id, "schedule confirmed");
    }

    Ok(report)
}

/// Fetches the saved week, treating "no data" as an empty week.
pub async fn fetch_saved(api: &dyn ScheduleApi, week: Week) -> Result<SavedWeek, ApiError> {
    let saved = api.fetch_week(week.start()).await?;
    if saved.is_none() {
        info!(week = %week.start(), "no saved schedule for week");
    }
    Ok(saved.unwrap_or_default())
}
