use crate::schedule::{
    Block, Editor, ExceptionMode, Interaction, PreviewKind, ScheduleError, ShiftKind, Source,
    VacationScope, Validity, Weekday,
};

use super::{date, sample_saved, sample_state, t};

#[test]
fn editing_saved_shift_queues_exception_and_one_day_draft() {
    let tuesday = date(2026, 2, 10);
    let original = sample_saved(tuesday, "09:00", "17:00");
    let mut state = sample_state(vec![original.clone()], vec![]);
    let mut editor = Editor::new();

    editor.click_shift(&state, original.clone()).unwrap();
    editor.choose_edit(&mut state).unwrap();
    editor.update_edit(&mut state, "8:00", "17:00").unwrap();

    let preview = state.preview().unwrap();
    assert_eq!(
        preview.kept,
        Some(Block {
            day: Weekday::Tue,
            start_min: 540,
            end_min: 1020,
        })
    );
    assert_eq!(preview.segments.len(), 1);
    assert_eq!(preview.segments[0].kind, PreviewKind::Add);
    assert_eq!(preview.segments[0].block.start_min, 480);

    editor.confirm_edit(&mut state).unwrap();
    assert!(editor.is_idle());
    assert!(state.preview().is_none());

    let pending = state.pending();
    assert_eq!(pending.exceptions.len(), 1);
    assert_eq!(pending.exceptions[0].mode, ExceptionMode::OnlyThisBlock);
    assert_eq!(pending.exceptions[0].date, tuesday);
    assert_eq!((pending.exceptions[0].start, pending.exceptions[0].end), (t("09:00"), t("17:00")));

    assert_eq!(pending.shifts.len(), 1);
    let draft = &pending.shifts[0];
    assert_eq!((draft.start(), draft.end()), (t("08:00"), t("17:00")));
    assert_eq!(draft.source, Source::Draft);
    assert_eq!(draft.validity.from, Some(tuesday));
    assert_eq!(draft.validity.to, Some(tuesday));

    let view = state.view();
    assert_eq!(view.len(), 1);
    assert_eq!((view[0].block.start_min, view[0].block.end_min), (480, 1020));
    assert_eq!(state.total_minutes(), 540);
}

#[test]
fn editing_draft_changes_it_in_place() {
    let mut state = sample_state(vec![], vec![]);
    state
        .add_shifts(&[Weekday::Wed], t("09:00"), t("12:00"), ShiftKind::Regular, Validity::default())
        .unwrap();
    let draft = state.shift_at(Weekday::Wed, 600).unwrap();
    let mut editor = Editor::new();

    editor.click_shift(&state, draft).unwrap();
    editor.choose_edit(&mut state).unwrap();
    editor.update_edit(&mut state, "10:00", "13:00").unwrap();
    editor.confirm_edit(&mut state).unwrap();

    assert!(state.pending().exceptions.is_empty());
    assert_eq!(state.pending().shifts.len(), 1);
    assert_eq!(state.pending().shifts[0].start(), t("10:00"));
    assert_eq!(state.total_minutes(), 180);
}

#[test]
fn edit_into_a_neighbour_is_rejected() {
    let tuesday = date(2026, 2, 10);
    let first = sample_saved(tuesday, "09:00", "13:00");
    let mut state = sample_state(vec![first.clone(), sample_saved(tuesday, "14:00", "17:00")], vec![]);
    let mut editor = Editor::new();

    editor.click_shift(&state, first).unwrap();
    editor.choose_edit(&mut state).unwrap();
    editor.update_edit(&mut state, "09:00", "15:00").unwrap();
    assert!(matches!(editor.confirm_edit(&mut state), Err(ScheduleError::Overlap { .. })));
    assert!(matches!(editor.interaction(), Interaction::Editing { .. }));
    assert!(!state.has_pending());
}

#[test]
fn unchanged_edit_is_a_no_op() {
    let shift = sample_saved(date(2026, 2, 9), "09:00", "13:00");
    let mut state = sample_state(vec![shift.clone()], vec![]);
    let mut editor = Editor::new();

    editor.click_shift(&state, shift).unwrap();
    editor.choose_edit(&mut state).unwrap();
    editor.confirm_edit(&mut state).unwrap();
    assert!(editor.is_idle());
    assert!(!state.has_pending());
}

#[test]
fn unreadable_edit_previews_full_removal() {
    let shift = sample_saved(date(2026, 2, 9), "09:00", "13:00");
    let mut state = sample_state(vec![shift.clone()], vec![]);
    let mut editor = Editor::new();

    editor.click_shift(&state, shift).unwrap();
    editor.choose_edit(&mut state).unwrap();
    editor.update_edit(&mut state, "9:", "13:00").unwrap();

    let preview = state.preview().unwrap();
    assert!(preview.edited.is_none());
    assert_eq!(preview.segments.len(), 1);
    assert_eq!(preview.segments[0].kind, PreviewKind::Delete);
    assert!(matches!(editor.confirm_edit(&mut state), Err(ScheduleError::InvalidTime(_))));
}

#[test]
fn deleting_draft_skips_the_scope_prompt() {
    let mut state = sample_state(vec![], vec![]);
    state
        .add_shifts(&[Weekday::Sat], t("10:00"), t("14:00"), ShiftKind::Regular, Validity::default())
        .unwrap();
    let draft = state.shift_at(Weekday::Sat, 700).unwrap();
    let mut editor = Editor::new();

    editor.click_shift(&state, draft).unwrap();
    editor.choose_delete(&mut state).unwrap();
    assert!(editor.is_idle());
    assert!(!state.has_pending());
}

#[test]
fn past_bulk_delete_is_refused() {
    let monday = date(2026, 2, 9);
    let shift = sample_saved(monday, "09:00", "13:00");
    let mut state = sample_state(vec![shift.clone()], vec![]);
    let mut editor = Editor::new();
    let today = date(2026, 2, 11);

    editor.click_shift(&state, shift).unwrap();
    editor.choose_delete(&mut state).unwrap();
    assert!(matches!(editor.interaction(), Interaction::DeleteScopeShown { .. }));

    assert_eq!(
        editor.confirm_delete(&mut state, ExceptionMode::FromThisDayOn, today),
        Err(ScheduleError::PastBulkDelete { date: monday })
    );
    assert!(matches!(editor.interaction(), Interaction::DeleteScopeShown { .. }));
    assert!(!state.has_pending());

    editor.confirm_delete(&mut state, ExceptionMode::OnlyThisBlock, today).unwrap();
    assert_eq!(state.pending().exceptions.len(), 1);
    assert!(state.view().is_empty());
}

#[test]
fn future_bulk_delete_is_queued() {
    let shift = sample_saved(date(2026, 2, 13), "09:00", "13:00");
    let mut state = sample_state(vec![shift.clone()], vec![]);
    let mut editor = Editor::new();

    editor.click_shift(&state, shift).unwrap();
    editor.choose_delete(&mut state).unwrap();
    editor
        .confirm_delete(&mut state, ExceptionMode::FromThisDayOn, date(2026, 2, 9))
        .unwrap();
    assert_eq!(state.pending().exceptions[0].mode, ExceptionMode::FromThisDayOn);
}

#[test]
fn vacation_clicks_follow_their_source() {
    let saved_day = date(2026, 2, 10);
    let mut state = sample_state(vec![], vec![saved_day]);
    state.add_vacation_range(date(2026, 2, 12), date(2026, 2, 12)).unwrap();
    let mut editor = Editor::new();

    editor.click_vacation(&mut state, date(2026, 2, 12)).unwrap();
    assert!(editor.is_idle());
    assert!(state.pending().vacations.is_empty());

    editor.click_vacation(&mut state, saved_day).unwrap();
    assert_eq!(editor.interaction(), &Interaction::VacationScopeShown { date: saved_day });
    assert_eq!(
        editor.confirm_vacation_removal(&mut state, VacationScope::Forward, date(2026, 2, 11)),
        Err(ScheduleError::PastBulkDelete { date: saved_day })
    );
    editor
        .confirm_vacation_removal(&mut state, VacationScope::Single, date(2026, 2, 11))
        .unwrap();
    assert!(state.vacation_days().is_empty());
    assert_eq!(state.pending().vacation_removals.len(), 1);
}

#[test]
fn gestures_are_refused_while_syncing() {
    let shift = sample_saved(date(2026, 2, 9), "09:00", "13:00");
    let mut state = sample_state(vec![shift.clone()], vec![date(2026, 2, 10)]);
    let mut editor = Editor::new();
    state.begin_sync().unwrap();

    assert_eq!(editor.click_shift(&state, shift), Err(ScheduleError::Busy));
    assert_eq!(editor.click_vacation(&mut state, date(2026, 2, 10)), Err(ScheduleError::Busy));
    assert!(editor.is_idle());
}
