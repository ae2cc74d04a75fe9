//! Translates clicks on the week grid into pending changes.
//!
//! Exactly one interaction is active at a time; every variant carries the
//! shift or date it is about.

use chrono::NaiveDate;
use tracing::debug;

use super::error::ScheduleError;
use super::interval::{
    ExceptionMode, Interval, Shift, ShiftException, Source, VacationRemoval, VacationScope, Validity,
};
use super::merge::Block;
use super::overlap::find_overlap;
use super::state::{same_shift, ScheduleState};
use super::time::TimeOfDay;

/// Raw text of the edit form, kept as typed so half-entered values survive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditForm {
    pub start: String,
    pub end: String,
}

impl EditForm {
    fn for_shift(shift: &Shift) -> Self {
        Self {
            start: shift.start().to_string(),
            end: shift.end().to_string(),
        }
    }

    fn interval(&self, target: &Shift) -> Result<Interval, ScheduleError> {
        let start = TimeOfDay::parse_input(&self.start)?;
        let end = TimeOfDay::parse_input(&self.end)?;
        Interval::checked(target.weekday(), start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    OptionsShown {
        target: Shift,
    },
    DeleteScopeShown {
        target: Shift,
    },
    Editing {
        target: Shift,
        form: EditForm,
    },
    VacationScopeShown {
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Add,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSegment {
    pub kind: PreviewKind,
    pub block: Block,
}

/// Live difference between a shift and its in-progress edit. Display only.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPreview {
    pub original: Shift,
    pub edited: Option<Interval>,
    /// Part of the original that survives the edit.
    pub kept: Option<Block>,
    pub segments: Vec<PreviewSegment>,
}

impl EditPreview {
    pub fn compute(original: &Shift, edited: Option<Interval>) -> Self {
        let before = Block::from(&original.interval);
        let (kept, segments) = match edited {
            Some(interval) => {
                let after = Block::from(&interval);
                let mut segments: Vec<PreviewSegment> = subtract(after, before)
                    .into_iter()
                    .map(|block| PreviewSegment {
                        kind: PreviewKind::Add,
                        block,
                    })
                    .collect();
                segments.extend(subtract(before, after).into_iter().map(|block| PreviewSegment {
                    kind: PreviewKind::Delete,
                    block,
                }));
                (intersect(before, after), segments)
            }
            None => (
                None,
                vec![PreviewSegment {
                    kind: PreviewKind::Delete,
                    block: before,
                }],
            ),
        };
        Self {
            original: original.clone(),
            edited,
            kept,
            segments,
        }
    }

    pub fn original_matches(&self, shift: &Shift) -> bool {
        same_shift(&self.original, shift)
    }
}

fn intersect(a: Block, b: Block) -> Option<Block> {
    let start_min = a.start_min.max(b.start_min);
    let end_min = a.end_min.min(b.end_min);
    (start_min < end_min).then_some(Block {
        day: a.day,
        start_min,
        end_min,
    })
}

/// `a` minus `b`, at most two pieces.
fn subtract(a: Block, b: Block) -> Vec<Block> {
    let Some(common) = intersect(a, b) else {
        return vec![a];
    };
    let mut pieces = Vec::with_capacity(2);
    if a.start_min < common.start_min {
        pieces.push(Block {
            end_min: common.start_min,
            ..a
        });
    }
    if common.end_min < a.end_min {
        pieces.push(Block {
            start_min: common.end_min,
            ..a
        });
    }
    pieces
}

#[derive(Debug, Default)]
pub struct Editor {
    interaction: Interaction,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.interaction, Interaction::Idle)
    }

    fn ensure_free(state: &ScheduleState) -> Result<(), ScheduleError> {
        if state.is_syncing() {
            return Err(ScheduleError::Busy);
        }
        if !state.is_loaded() {
            return Err(ScheduleError::NotLoaded);
        }
        Ok(())
    }

    pub fn click_shift(&mut self, state: &ScheduleState, target: Shift) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        debug!(date = %target.date, start = %target.start(), end = %target.end(), "shift selected");
        self.interaction = Interaction::OptionsShown { target };
        Ok(())
    }

    /// Draft vacation days are dropped right away; saved ones ask for a scope.
    pub fn click_vacation(&mut self, state: &mut ScheduleState, date: NaiveDate) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let vacation = state.vacation_on(date).ok_or(ScheduleError::NoSelection)?;
        match vacation.source {
            Source::Draft => {
                state.remove_draft_vacation(date)?;
                self.interaction = Interaction::Idle;
            }
            Source::Saved => self.interaction = Interaction::VacationScopeShown { date },
        }
        Ok(())
    }

    /// Drafts are removed on the spot; saved shifts need a scope.
    pub fn choose_delete(&mut self, state: &mut ScheduleState) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::OptionsShown { target } = &self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        match target.draft_id {
            Some(id) => {
                state.remove_draft_shift(id)?;
                self.interaction = Interaction::Idle;
            }
            None => {
                self.interaction = Interaction::DeleteScopeShown {
                    target: target.clone(),
                };
            }
        }
        Ok(())
    }

    /// Queues the scoped deletion. A bulk scope on a past date is refused and
    /// the scope prompt stays open.
    pub fn confirm_delete(
        &mut self,
        state: &mut ScheduleState,
        mode: ExceptionMode,
        today: NaiveDate,
    ) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::DeleteScopeShown { target } = &self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        if mode.is_bulk() && target.date < today {
            return Err(ScheduleError::PastBulkDelete { date: target.date });
        }
        state.push_exception(ShiftException::for_shift(target, mode))?;
        self.interaction = Interaction::Idle;
        Ok(())
    }

    pub fn confirm_vacation_removal(
        &mut self,
        state: &mut ScheduleState,
        scope: VacationScope,
        today: NaiveDate,
    ) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::VacationScopeShown { date } = self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        if scope == VacationScope::Forward && date < today {
            return Err(ScheduleError::PastBulkDelete { date });
        }
        state.push_vacation_removal(VacationRemoval { date, scope })?;
        self.interaction = Interaction::Idle;
        Ok(())
    }

    pub fn choose_edit(&mut self, state: &mut ScheduleState) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::OptionsShown { target } = &self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        let target = target.clone();
        state.set_preview(Some(EditPreview::compute(&target, Some(target.interval))));
        self.interaction = Interaction::Editing {
            form: EditForm::for_shift(&target),
            target,
        };
        Ok(())
    }

    /// Stores the form text and recomputes the preview. Unparseable input
    /// previews as a full removal until it becomes valid again.
    pub fn update_edit(&mut self, state: &mut ScheduleState, start: &str, end: &str) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::Editing { target, form } = &mut self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        form.start = start.to_string();
        form.end = end.to_string();
        let edited = form.interval(target).ok();
        state.set_preview(Some(EditPreview::compute(target, edited)));
        Ok(())
    }

    /// Applies the edit: a draft is changed in place, a saved occurrence is
    /// hidden for its date and replaced by a one-day draft.
    pub fn confirm_edit(&mut self, state: &mut ScheduleState) -> Result<(), ScheduleError> {
        Self::ensure_free(state)?;
        let Interaction::Editing { target, form } = &self.interaction else {
            return Err(ScheduleError::NoSelection);
        };
        let interval = form.interval(target)?;

        if interval.same_span(&target.interval) {
            return self.cancel(state);
        }

        let pool = state.overlap_pool(Some(target));
        if let Some(conflict) = find_overlap(&interval, &pool) {
            return Err(ScheduleError::Overlap {
                day: conflict.day,
                start: conflict.start,
                end: conflict.end,
            });
        }

        match target.draft_id {
            Some(id) => state.replace_draft_span(id, interval)?,
            None => {
                state.push_exception(ShiftException::for_shift(target, ExceptionMode::OnlyThisBlock))?;
                let validity = Validity {
                    from: Some(target.date),
                    to: Some(target.date),
                };
                let mut replacement = target.clone();
                replacement.interval = interval;
                replacement.validity = validity;
                state.push_draft(replacement)?;
            }
        }
        debug!(date = %target.date, start = %interval.start, end = %interval.end, "shift edited");
        state.set_preview(None);
        self.interaction = Interaction::Idle;
        Ok(())
    }

    pub fn cancel(&mut self, state: &mut ScheduleState) -> Result<(), ScheduleError> {
        state.set_preview(None);
        self.interaction = Interaction::Idle;
        Ok(())
    }

    /// Drops whatever was selected, e.g. after the week changed.
    pub fn reset(&mut self, state: &mut ScheduleState) {
        state.set_preview(None);
        self.interaction = Interaction::Idle;
    }
}
