use crate::schedule::{
    Block, Editor, ExceptionMode, SavedWeek, ScheduleError, ScheduleState, ShiftException,
    ShiftKind, Validity, VacationRemoval, VacationScope, WeekSwitch, Weekday,
    MAX_VACATION_RANGE_DAYS,
};

use super::{date, sample_saved, sample_state, sample_week, t};

#[test]
fn saved_and_draft_merge_into_one_block() {
    let mut state = sample_state(vec![sample_saved(date(2026, 2, 9), "09:00", "13:00")], vec![]);
    state
        .add_shifts(&[Weekday::Mon], t("13:00"), t("17:00"), ShiftKind::Regular, Validity::default())
        .unwrap();

    let view = state.view();
    assert_eq!(view.len(), 1);
    assert_eq!(
        view[0].block,
        Block {
            day: Weekday::Mon,
            start_min: 540,
            end_min: 1020,
        }
    );
    assert!(view[0].draft);
    assert_eq!(view[0].members.len(), 2);
    assert_eq!(state.total_minutes(), 480);
    assert_eq!(state.merged_draft().len(), 1);
}

#[test]
fn overlapping_proposal_leaves_drafts_untouched() {
    let mut state = sample_state(vec![sample_saved(date(2026, 2, 10), "09:00", "14:00")], vec![]);
    let err = state
        .add_shifts(
            &[Weekday::Mon, Weekday::Tue],
            t("13:00"),
            t("17:00"),
            ShiftKind::Regular,
            Validity::default(),
        )
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Overlap { day: Weekday::Tue, .. }));
    assert!(!state.has_pending());
}

#[test]
fn vacation_day_suppresses_shifts() {
    let tuesday = date(2026, 2, 10);
    let state = sample_state(
        vec![
            sample_saved(tuesday, "09:00", "17:00"),
            sample_saved(date(2026, 2, 11), "09:00", "17:00"),
        ],
        vec![tuesday],
    );
    assert!(state.view().iter().all(|b| b.date != tuesday));
    assert_eq!(state.day_minutes(Weekday::Tue), 0);
    assert_eq!(state.total_minutes(), 480);
    assert!(state.shift_at(Weekday::Tue, 600).is_none());
}

#[test]
fn draft_vacation_hides_drafts_too() {
    let mut state = sample_state(vec![], vec![]);
    state
        .add_shifts(&[Weekday::Wed], t("09:00"), t("12:00"), ShiftKind::Regular, Validity::default())
        .unwrap();
    assert_eq!(state.add_vacation_range(date(2026, 2, 11), date(2026, 2, 11)).unwrap(), 1);
    assert!(state.view().is_empty());
    assert_eq!(state.pending().len(), 2);
}

#[test]
fn overtime_is_kept_out_of_the_total() {
    let mut state = sample_state(vec![sample_saved(date(2026, 2, 12), "09:00", "13:00")], vec![]);
    state
        .add_shifts(&[Weekday::Thu], t("18:00"), t("20:00"), ShiftKind::Overtime, Validity::default())
        .unwrap();
    assert_eq!(state.total_minutes(), 240);
    assert_eq!(state.overtime_minutes(), 120);
}

#[test]
fn replace_saved_drops_other_weeks() {
    let state = sample_state(
        vec![
            sample_saved(date(2026, 2, 9), "09:00", "13:00"),
            sample_saved(date(2026, 2, 16), "09:00", "13:00"),
        ],
        vec![],
    );
    assert_eq!(state.saved().shifts.len(), 1);
    assert_eq!(state.schedule_id(), Some("42"));
}

#[test]
fn vacation_ranges_skip_existing_days() {
    let mut state = sample_state(vec![], vec![date(2026, 2, 10)]);
    assert_eq!(
        state.add_vacation_range(date(2026, 2, 12), date(2026, 2, 10)),
        Err(ScheduleError::InvertedRange {
            from: date(2026, 2, 12),
            to: date(2026, 2, 10),
        })
    );
    assert_eq!(state.add_vacation_range(date(2026, 2, 9), date(2026, 2, 11)).unwrap(), 2);
    assert_eq!(state.add_vacation_range(date(2026, 2, 9), date(2026, 2, 11)).unwrap(), 0);
    assert_eq!(state.vacation_days().len(), 3);
}

#[test]
fn bulk_exception_hides_later_occurrences_only() {
    let monday = sample_saved(date(2026, 2, 9), "09:00", "13:00");
    let exception = ShiftException::for_shift(&monday, ExceptionMode::FromThisDayOn);
    assert!(exception.hides(&monday));
    assert!(exception.hides(&sample_saved(date(2026, 2, 16), "09:00", "13:00")));
    assert!(!exception.hides(&sample_saved(date(2026, 2, 2), "09:00", "13:00")));
    assert!(!exception.hides(&sample_saved(date(2026, 2, 10), "09:00", "13:00")));
    assert!(!exception.hides(&sample_saved(date(2026, 2, 16), "09:00", "12:00")));
}

#[test]
fn forward_vacation_removal_covers_later_dates() {
    let removal = VacationRemoval {
        date: date(2026, 2, 10),
        scope: VacationScope::Forward,
    };
    assert!(removal.hides(date(2026, 2, 10)));
    assert!(removal.hides(date(2026, 3, 1)));
    assert!(!removal.hides(date(2026, 2, 9)));
}

#[test]
fn sync_blocks_every_mutation() {
    let mut state = sample_state(vec![], vec![]);
    state
        .add_shifts(&[Weekday::Mon], t("09:00"), t("10:00"), ShiftKind::Regular, Validity::default())
        .unwrap();
    state.begin_sync().unwrap();

    assert_eq!(state.begin_sync(), Err(ScheduleError::Busy));
    assert_eq!(
        state.add_shifts(&[Weekday::Tue], t("09:00"), t("10:00"), ShiftKind::Regular, Validity::default()),
        Err(ScheduleError::Busy)
    );
    assert_eq!(
        state.add_vacation_range(date(2026, 2, 10), date(2026, 2, 10)),
        Err(ScheduleError::Busy)
    );
    assert_eq!(state.request_week(sample_week().next()), Err(ScheduleError::Busy));

    state.finish_sync(false);
    assert_eq!(state.pending().shifts.len(), 1);

    state.begin_sync().unwrap();
    state.finish_sync(true);
    assert!(!state.has_pending());
    assert!(!state.is_syncing());
}

#[test]
fn switching_weeks_warns_before_discarding() {
    let mut state = sample_state(vec![sample_saved(date(2026, 2, 9), "09:00", "13:00")], vec![]);
    state
        .add_shifts(&[Weekday::Fri], t("09:00"), t("10:00"), ShiftKind::Regular, Validity::default())
        .unwrap();

    let next = sample_week().next();
    assert_eq!(state.request_week(next), Ok(WeekSwitch::NeedsConfirmation(next)));
    assert_eq!(state.week(), sample_week());
    assert!(state.has_pending());

    state.discard_and_switch(next).unwrap();
    assert_eq!(state.week(), next);
    assert!(!state.has_pending());
    assert!(state.saved().shifts.is_empty());

    assert_eq!(state.request_week(sample_week()), Ok(WeekSwitch::Switched(sample_week())));
}

#[test]
fn failed_sync_keeps_created_record_id() {
    let mut state = ScheduleState::new(sample_week());
    state.remember_schedule_id("77".to_string());
    state.remember_schedule_id("78".to_string());
    assert_eq!(state.schedule_id(), Some("77"));
}

#[test]
fn deleted_saved_shift_frees_its_slot() {
    let monday = sample_saved(date(2026, 2, 9), "09:00", "13:00");
    let mut state = sample_state(vec![monday.clone()], vec![]);
    state
        .push_exception(ShiftException::for_shift(&monday, ExceptionMode::OnlyThisBlock))
        .unwrap();
    assert!(state.view().is_empty());
    state
        .add_shifts(&[Weekday::Mon], t("10:00"), t("12:00"), ShiftKind::Regular, Validity::default())
        .unwrap();
    assert_eq!(state.total_minutes(), 120);
}

#[test]
fn edits_wait_for_the_week_to_load() {
    let previous = sample_week().previous();
    let mut state = ScheduleState::new(previous);
    state.replace_saved(SavedWeek::default());
    assert!(state.is_loaded());

    assert_eq!(state.request_week(sample_week()), Ok(WeekSwitch::Switched(sample_week())));
    assert!(!state.is_loaded());
    assert_eq!(
        state.add_shifts(&[Weekday::Mon], t("10:00"), t("12:00"), ShiftKind::Regular, Validity::default()),
        Err(ScheduleError::NotLoaded)
    );
    assert_eq!(
        state.add_vacation_range(date(2026, 2, 10), date(2026, 2, 10)),
        Err(ScheduleError::NotLoaded)
    );
    assert_eq!(state.begin_sync(), Err(ScheduleError::NotLoaded));
    assert!(!state.has_pending());

    let monday = sample_saved(date(2026, 2, 9), "09:00", "17:00");
    let mut editor = Editor::new();
    assert_eq!(editor.click_shift(&state, monday.clone()), Err(ScheduleError::NotLoaded));

    state.replace_saved(SavedWeek {
        schedule_id: Some("42".to_string()),
        status: None,
        shifts: vec![monday],
        vacations: vec![],
    });
    assert!(matches!(
        state.add_shifts(&[Weekday::Mon], t("10:00"), t("12:00"), ShiftKind::Regular, Validity::default()),
        Err(ScheduleError::Overlap { .. })
    ));
}

#[test]
fn successful_sync_waits_for_the_refetch() {
    let mut state = sample_state(vec![], vec![]);
    state.add_vacation_range(date(2026, 2, 10), date(2026, 2, 10)).unwrap();
    state.begin_sync().unwrap();
    state.finish_sync(true);

    assert!(!state.is_loaded());
    assert_eq!(state.begin_sync(), Err(ScheduleError::NotLoaded));
}

#[test]
fn vacation_range_is_capped() {
    let mut state = sample_state(vec![], vec![]);
    assert_eq!(
        state.add_vacation_range(date(2026, 2, 9), date(9999, 12, 31)),
        Err(ScheduleError::RangeTooLong {
            days: (date(9999, 12, 31) - date(2026, 2, 9)).num_days() + 1,
            max: MAX_VACATION_RANGE_DAYS,
        })
    );
    assert!(!state.has_pending());

    let last = date(2026, 2, 9) + chrono::Duration::days(MAX_VACATION_RANGE_DAYS - 1);
    assert_eq!(state.add_vacation_range(date(2026, 2, 9), last).unwrap(), 366);
    assert_eq!(state.pending().vacations.len(), 366);
}
