//! Reconciliation of the saved week with the local, not yet synced edits.
//!
//! The three sets (saved, draft, exceptions) are kept apart and only combined
//! when a view or total is derived. `saved` is replaced wholesale on every
//! fetch and never patched locally.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ScheduleError;
use super::gesture::EditPreview;
use super::interval::{
    DraftId, Interval, Shift, ShiftException, ShiftKind, Source, VacationDay, VacationRemoval,
    Validity,
};
use super::merge::{merge_with, Block};
use super::overlap::validate_proposal;
use super::time::{TimeOfDay, Weekday};
use super::week::Week;

/// Longest vacation range accepted in one go.
pub const MAX_VACATION_RANGE_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Draft,
    Confirmed,
}

/// What the backend reported for one week.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedWeek {
    pub schedule_id: Option<String>,
    pub status: Option<ScheduleStatus>,
    pub shifts: Vec<Shift>,
    pub vacations: Vec<NaiveDate>,
}

/// Local edits waiting for "confirm schedule".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges {
    pub shifts: Vec<Shift>,
    pub vacations: BTreeSet<NaiveDate>,
    pub exceptions: Vec<ShiftException>,
    pub vacation_removals: Vec<VacationRemoval>,
}

impl PendingChanges {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.shifts.len() + self.vacations.len() + self.exceptions.len() + self.vacation_removals.len()
    }
}

/// A merged block of the rendered week.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewBlock {
    pub date: NaiveDate,
    pub block: Block,
    /// Any constituent is a draft.
    pub draft: bool,
    pub members: Vec<Shift>,
}

/// Outcome of asking to display another week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSwitch {
    /// Nothing pending; the week changed and must be fetched.
    Switched(Week),
    /// Pending edits would be lost; ask before calling `discard_and_switch`.
    NeedsConfirmation(Week),
}

#[derive(Debug, Clone)]
pub struct ScheduleState {
    week: Week,
    saved: SavedWeek,
    pending: PendingChanges,
    preview: Option<EditPreview>,
    next_draft: u64,
    syncing: bool,
    /// `saved` reflects the backend for `week`.
    loaded: bool,
}

impl ScheduleState {
    pub fn new(week: Week) -> Self {
        Self {
            week,
            saved: SavedWeek::default(),
            pending: PendingChanges::default(),
            preview: None,
            next_draft: 1,
            syncing: false,
            loaded: false,
        }
    }

    pub fn week(&self) -> Week {
        self.week
    }

    pub fn saved(&self) -> &SavedWeek {
        &self.saved
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    pub fn preview(&self) -> Option<&EditPreview> {
        self.preview.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }

    /// False until the fetch for the displayed week lands, and again after a
    /// successful sync until the re-fetch does.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn schedule_id(&self) -> Option<&str> {
        self.saved.schedule_id.as_deref()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Installs a freshly fetched week. Shifts dated outside the displayed
    /// week are dropped.
    pub fn replace_saved(&mut self, mut saved: SavedWeek) {
        let week = self.week;
        saved.shifts.retain(|s| week.contains(s.date));
        saved.shifts.iter_mut().for_each(|s| s.source = Source::Saved);
        debug!(
            week = %week.start(),
            shifts = saved.shifts.len(),
            vacations = saved.vacations.len(),
            "saved week replaced"
        );
        self.saved = saved;
        self.loaded = true;
    }

    /// Remembers a record id created by a sync attempt that failed later on,
    /// so the retry does not create a second record.
    pub fn remember_schedule_id(&mut self, id: String) {
        self.saved.schedule_id.get_or_insert(id);
    }

    pub fn begin_sync(&mut self) -> Result<(), ScheduleError> {
        self.ensure_ready()?;
        self.syncing = true;
        Ok(())
    }

    /// Ends the in-flight sync. Local edits are only dropped on success; the
    /// caller re-fetches afterwards.
    pub fn finish_sync(&mut self, success: bool) {
        self.syncing = false;
        if success {
            self.pending = PendingChanges::default();
            self.preview = None;
            self.loaded = false;
        }
    }

    pub fn discard_pending(&mut self) {
        if self.has_pending() {
            info!(count = self.pending.len(), "discarding unsynced edits");
        }
        self.pending = PendingChanges::default();
        self.preview = None;
    }

    pub fn request_week(&mut self, week: Week) -> Result<WeekSwitch, ScheduleError> {
        self.ensure_idle()?;
        if self.has_pending() {
            return Ok(WeekSwitch::NeedsConfirmation(week));
        }
        self.show_week(week);
        Ok(WeekSwitch::Switched(week))
    }

    pub fn discard_and_switch(&mut self, week: Week) -> Result<(), ScheduleError> {
        self.ensure_idle()?;
        self.discard_pending();
        self.show_week(week);
        Ok(())
    }

    fn show_week(&mut self, week: Week) {
        self.week = week;
        self.saved = SavedWeek::default();
        self.preview = None;
        self.loaded = false;
    }

    fn ensure_idle(&self) -> Result<(), ScheduleError> {
        if self.syncing {
            return Err(ScheduleError::Busy);
        }
        Ok(())
    }

    /// Edits are checked against `saved`, so they wait for it to load.
    fn ensure_ready(&self) -> Result<(), ScheduleError> {
        self.ensure_idle()?;
        if !self.loaded {
            return Err(ScheduleError::NotLoaded);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations driven by gestures
    // ------------------------------------------------------------------

    /// Adds one draft shift per day. The whole proposal is rejected if any
    /// day collides with a saved or draft shift.
    pub fn add_shifts(
        &mut self,
        days: &[Weekday],
        start: TimeOfDay,
        end: TimeOfDay,
        kind: ShiftKind,
        validity: Validity,
    ) -> Result<Vec<DraftId>, ScheduleError> {
        self.ensure_ready()?;
        let existing = self.overlap_pool(None);
        let accepted = validate_proposal(days, start, end, &existing)?;

        let mut ids = Vec::with_capacity(accepted.len());
        for interval in accepted {
            let id = self.allocate_draft_id();
            let date = self.week.date_of(interval.day);
            self.pending
                .shifts
                .push(Shift::draft(id, date, interval.start, interval.end, kind, validity));
            ids.push(id);
        }
        info!(count = ids.len(), %start, %end, "draft shifts added");
        Ok(ids)
    }

    pub fn remove_draft_shift(&mut self, id: DraftId) -> Result<bool, ScheduleError> {
        self.ensure_idle()?;
        let before = self.pending.shifts.len();
        self.pending.shifts.retain(|s| s.draft_id != Some(id));
        Ok(self.pending.shifts.len() != before)
    }

    /// Swaps the span of a draft shift in place.
    pub(crate) fn replace_draft_span(&mut self, id: DraftId, interval: Interval) -> Result<(), ScheduleError> {
        self.ensure_ready()?;
        let shift = self
            .pending
            .shifts
            .iter_mut()
            .find(|s| s.draft_id == Some(id))
            .ok_or(ScheduleError::NoSelection)?;
        shift.interval = interval;
        Ok(())
    }

    pub(crate) fn push_draft(&mut self, mut shift: Shift) -> Result<DraftId, ScheduleError> {
        self.ensure_ready()?;
        let id = self.allocate_draft_id();
        shift.draft_id = Some(id);
        shift.id = None;
        shift.source = Source::Draft;
        self.pending.shifts.push(shift);
        Ok(id)
    }

    pub(crate) fn push_exception(&mut self, exception: ShiftException) -> Result<(), ScheduleError> {
        self.ensure_ready()?;
        if !self.pending.exceptions.contains(&exception) {
            self.pending.exceptions.push(exception);
        }
        Ok(())
    }

    pub(crate) fn push_vacation_removal(&mut self, removal: VacationRemoval) -> Result<(), ScheduleError> {
        self.ensure_ready()?;
        if !self.pending.vacation_removals.contains(&removal) {
            self.pending.vacation_removals.push(removal);
        }
        Ok(())
    }

    /// Expands `from..=to` into draft vacation days, skipping dates that are
    /// already vacation. Returns how many days were added.
    pub fn add_vacation_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<usize, ScheduleError> {
        self.ensure_ready()?;
        if to < from {
            return Err(ScheduleError::InvertedRange { from, to });
        }
        let days = (to - from).num_days() + 1;
        if days > MAX_VACATION_RANGE_DAYS {
            return Err(ScheduleError::RangeTooLong {
                days,
                max: MAX_VACATION_RANGE_DAYS,
            });
        }

        let saved: BTreeSet<NaiveDate> = self.saved.vacations.iter().copied().collect();
        let mut added = 0;
        for date in from.iter_days().take_while(|d| *d <= to) {
            if saved.contains(&date) && !self.is_vacation_removed(date) {
                continue;
            }
            if self.pending.vacations.insert(date) {
                added += 1;
            }
        }
        info!(%from, %to, added, "draft vacation days added");
        Ok(added)
    }

    pub fn remove_draft_vacation(&mut self, date: NaiveDate) -> Result<bool, ScheduleError> {
        self.ensure_idle()?;
        Ok(self.pending.vacations.remove(&date))
    }

    pub(crate) fn set_preview(&mut self, preview: Option<EditPreview>) {
        self.preview = preview;
    }

    fn allocate_draft_id(&mut self) -> DraftId {
        let id = DraftId(self.next_draft);
        self.next_draft += 1;
        id
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    fn is_vacation_removed(&self, date: NaiveDate) -> bool {
        self.pending.vacation_removals.iter().any(|r| r.hides(date))
    }

    /// Vacation days shown for the displayed week.
    pub fn vacation_days(&self) -> Vec<VacationDay> {
        let mut days: Vec<VacationDay> = self
            .saved
            .vacations
            .iter()
            .filter(|d| !self.is_vacation_removed(**d))
            .map(|&date| VacationDay {
                date,
                source: Source::Saved,
            })
            .collect();
        for &date in &self.pending.vacations {
            if !days.iter().any(|v| v.date == date) {
                days.push(VacationDay {
                    date,
                    source: Source::Draft,
                });
            }
        }
        days.retain(|v| self.week.contains(v.date));
        days.sort_by_key(|v| v.date);
        days
    }

    fn vacation_dates(&self) -> BTreeSet<NaiveDate> {
        self.vacation_days().into_iter().map(|v| v.date).collect()
    }

    fn is_hidden_by_exception(&self, shift: &Shift) -> bool {
        self.pending.exceptions.iter().any(|e| e.hides(shift))
    }

    fn is_under_edit(&self, shift: &Shift) -> bool {
        self.preview
            .as_ref()
            .is_some_and(|p| p.original_matches(shift))
    }

    /// Saved occurrences minus those removed by pending exceptions, the one
    /// being edited and those on vacation days.
    pub fn visible_saved_shifts(&self) -> Vec<&Shift> {
        let vacations = self.vacation_dates();
        self.saved
            .shifts
            .iter()
            .filter(|s| !self.is_hidden_by_exception(s))
            .filter(|s| !self.is_under_edit(s))
            .filter(|s| !vacations.contains(&s.date))
            .collect()
    }

    pub fn visible_draft_shifts(&self) -> Vec<&Shift> {
        let vacations = self.vacation_dates();
        self.pending
            .shifts
            .iter()
            .filter(|s| !self.is_under_edit(s))
            .filter(|s| !vacations.contains(&s.date))
            .collect()
    }

    fn visible_shifts(&self) -> Vec<&Shift> {
        let mut shifts = self.visible_saved_shifts();
        shifts.extend(self.visible_draft_shifts());
        shifts
    }

    /// Merged blocks to draw, saved and draft combined per day.
    pub fn view(&self) -> Vec<ViewBlock> {
        let shifts = self.visible_shifts();
        merge_with(&shifts, |s| Block::from(&s.interval))
            .into_iter()
            .map(|run| ViewBlock {
                date: self.week.date_of(run.block.day),
                block: run.block,
                draft: run.members.iter().any(|s| s.is_draft()),
                members: run.members.into_iter().map(|s| (*s).clone()).collect(),
            })
            .collect()
    }

    /// `merge(draft)` on its own, for callers that only care about the edits.
    pub fn merged_draft(&self) -> Vec<Block> {
        merge_with(&self.pending.shifts, |s| Block::from(&s.interval))
            .into_iter()
            .map(|run| run.block)
            .collect()
    }

    fn merged_minutes(&self, kind: ShiftKind, day: Option<Weekday>) -> u32 {
        let shifts: Vec<&Shift> = self
            .visible_shifts()
            .into_iter()
            .filter(|s| s.kind == kind)
            .filter(|s| day.map_or(true, |d| s.weekday() == d))
            .collect();
        merge_with(&shifts, |s| Block::from(&s.interval))
            .iter()
            .map(|run| run.block.duration_minutes())
            .sum()
    }

    /// Regular minutes for the displayed week, after merging.
    pub fn total_minutes(&self) -> u32 {
        self.merged_minutes(ShiftKind::Regular, None)
    }

    pub fn overtime_minutes(&self) -> u32 {
        self.merged_minutes(ShiftKind::Overtime, None)
    }

    pub fn day_minutes(&self, day: Weekday) -> u32 {
        self.merged_minutes(ShiftKind::Regular, Some(day))
    }

    /// The visible shift under `minute` on `day`; saved shifts win over drafts.
    pub fn shift_at(&self, day: Weekday, minute: u32) -> Option<Shift> {
        let hit = |s: &&Shift| s.weekday() == day && s.interval.contains_minute(minute);
        let saved = self.visible_saved_shifts().into_iter().find(hit);
        saved
            .or_else(|| self.visible_draft_shifts().into_iter().find(hit))
            .cloned()
    }

    pub fn vacation_on(&self, date: NaiveDate) -> Option<VacationDay> {
        self.vacation_days().into_iter().find(|v| v.date == date)
    }

    /// Spans a new or edited shift must not collide with: saved shifts not
    /// removed by an exception plus drafts, minus `excluding`.
    pub fn overlap_pool(&self, excluding: Option<&Shift>) -> Vec<Interval> {
        let is_excluded = |s: &Shift| excluding.is_some_and(|e| same_shift(e, s));
        self.saved
            .shifts
            .iter()
            .filter(|s| !self.is_hidden_by_exception(s))
            .chain(self.pending.shifts.iter())
            .filter(|s| !is_excluded(s))
            .map(|s| s.interval)
            .collect()
    }
}

/// Identity of a shift occurrence: the draft handle for drafts, otherwise
/// source, date and span.
pub(crate) fn same_shift(a: &Shift, b: &Shift) -> bool {
    match (a.draft_id, b.draft_id) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.source == b.source && a.date == b.date && a.interval.same_span(&b.interval),
        _ => false,
    }
}
