use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::time::{deserialize_id, deserialize_optional_id, format_date, parse_date, parse_wire_time};
use crate::schedule::{
    ExceptionKind, ExceptionMode, NewShift, SavedWeek, ScheduleStatus, Shift, ShiftException,
    ShiftKind, VacationRemoval, VacationScope, Weekday,
};

// ============================================================================
// Responses
// ============================================================================

/// `GET .../schedules/user/{employeeId}/active?weekStart=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveScheduleResponse {
    #[serde(rename = "scheduleId", default, deserialize_with = "deserialize_optional_id")]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub date: String,
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(rename = "isVacation", default)]
    pub is_vacation: bool,
    #[serde(default)]
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ShiftKind,
    #[serde(rename = "validFrom", default)]
    pub valid_from: Option<String>,
    #[serde(rename = "validTo", default)]
    pub valid_to: Option<String>,
}

impl ActiveScheduleResponse {
    /// Reads a fetch body. Empty, `null` or unreadable bodies mean the week
    /// has no record yet and give `None`.
    pub fn decode(body: &str) -> Option<SavedWeek> {
        if body.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Option<ActiveScheduleResponse>>(body) {
            Ok(response) => response.map(ActiveScheduleResponse::into_saved_week),
            Err(e) => {
                warn!(error = %e, "unreadable schedule response, treating as empty");
                None
            }
        }
    }

    /// Converts the wire shape into the editor's saved week. Days and turns
    /// that cannot be read are skipped with a warning.
    pub fn into_saved_week(self) -> SavedWeek {
        let mut shifts = Vec::new();
        let mut vacations = Vec::new();

        for day in self.days {
            let Some(date) = parse_date(&day.date) else {
                warn!(date = %day.date, "skipping day with unreadable date");
                continue;
            };
            if let Some(number) = day.weekday {
                if Weekday::from_number(number) != Some(Weekday::of(date)) {
                    warn!(%date, weekday = number, "weekday does not match date, using the date");
                }
            }
            if day.is_vacation {
                vacations.push(date);
            }
            for turn in day.turns {
                let (Some(start), Some(end)) =
                    (parse_wire_time(&turn.start_time), parse_wire_time(&turn.end_time))
                else {
                    warn!(%date, start = %turn.start_time, end = %turn.end_time, "skipping unreadable turn");
                    continue;
                };
                if start == end {
                    warn!(%date, %start, "skipping zero-length turn");
                    continue;
                }
                let mut shift = Shift::saved(turn.id, date, start, end, turn.kind);
                shift.validity.from = turn.valid_from.as_deref().and_then(parse_date);
                shift.validity.to = turn.valid_to.as_deref().and_then(parse_date);
                shifts.push(shift);
            }
        }

        let status = match self.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("draft") => Some(ScheduleStatus::Draft),
            Some("confirmed") => Some(ScheduleStatus::Confirmed),
            Some(other) => {
                warn!(status = other, "unknown schedule status");
                None
            }
            None => None,
        };

        SavedWeek {
            schedule_id: self.schedule_id,
            status,
            shifts,
            vacations,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(rename = "commercialName", default)]
    pub commercial_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "firstSurname", default)]
    pub first_surname: Option<String>,
    #[serde(rename = "branchId", default, deserialize_with = "deserialize_optional_id")]
    pub branch_id: Option<String>,
}

impl Employee {
    pub fn display_name(&self) -> String {
        [self.name.as_deref(), self.first_surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Company and employee labels for the editor header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeContext {
    pub company_name: Option<String>,
    pub employee_name: Option<String>,
    pub branch_id: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

/// `POST .../schedules/{id}/shifts`
#[derive(Debug, Clone, Serialize)]
pub struct CreateShiftRequest {
    pub weekday: Weekday,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: ShiftKind,
    #[serde(rename = "validFrom", skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(rename = "validTo", skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
}

impl From<&NewShift> for CreateShiftRequest {
    fn from(shift: &NewShift) -> Self {
        Self {
            weekday: shift.weekday,
            start_time: shift.start.to_string(),
            end_time: shift.end.to_string(),
            kind: shift.kind,
            valid_from: shift.validity.from.map(format_date),
            valid_to: shift.validity.to.map(format_date),
        }
    }
}

/// `POST .../schedules/{id}/exceptions`
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionBatch {
    pub exceptions: Vec<ExceptionRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExceptionRequest {
    #[serde(rename = "type")]
    pub kind: ExceptionKind,
    pub date: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub mode: ExceptionMode,
}

impl From<&ShiftException> for ExceptionRequest {
    fn from(exception: &ShiftException) -> Self {
        Self {
            kind: exception.kind,
            date: format_date(exception.date),
            start_time: exception.start.to_string(),
            end_time: exception.end.to_string(),
            mode: exception.mode,
        }
    }
}

impl ExceptionBatch {
    pub fn new(exceptions: &[ShiftException]) -> Self {
        Self {
            exceptions: exceptions.iter().map(ExceptionRequest::from).collect(),
        }
    }
}

/// `POST .../schedules/{id}/vacations`
#[derive(Debug, Clone, Serialize)]
pub struct VacationRequest {
    pub date: String,
}

impl VacationRequest {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: format_date(date),
        }
    }
}

/// `DELETE .../schedules/{id}/vacations`
#[derive(Debug, Clone, Serialize)]
pub struct VacationDeleteRequest {
    pub date: String,
    pub mode: VacationScope,
}

impl From<&VacationRemoval> for VacationDeleteRequest {
    fn from(removal: &VacationRemoval) -> Self {
        Self {
            date: format_date(removal.date),
            mode: removal.scope,
        }
    }
}
