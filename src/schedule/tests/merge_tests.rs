use crate::schedule::{merge, merge_blocks, merge_with, total_minutes, Block, Weekday};

use super::iv;

fn block(day: Weekday, start_min: u32, end_min: u32) -> Block {
    Block { day, start_min, end_min }
}

#[test]
fn touching_intervals_coalesce() {
    let merged = merge(&[iv(Weekday::Mon, "09:00", "13:00"), iv(Weekday::Mon, "13:00", "17:00")]);
    assert_eq!(merged, vec![block(Weekday::Mon, 540, 1020)]);
    assert_eq!(total_minutes(&merged), 480);
}

#[test]
fn gaps_and_other_days_stay_apart() {
    let merged = merge(&[
        iv(Weekday::Tue, "14:00", "18:00"),
        iv(Weekday::Mon, "09:00", "12:00"),
        iv(Weekday::Tue, "08:00", "12:00"),
    ]);
    assert_eq!(
        merged,
        vec![
            block(Weekday::Mon, 540, 720),
            block(Weekday::Tue, 480, 720),
            block(Weekday::Tue, 840, 1080),
        ]
    );
}

#[test]
fn overlapping_entries_count_once() {
    let merged = merge(&[
        iv(Weekday::Wed, "09:00", "14:00"),
        iv(Weekday::Wed, "10:00", "11:00"),
        iv(Weekday::Wed, "13:00", "17:00"),
    ]);
    assert_eq!(merged, vec![block(Weekday::Wed, 540, 1020)]);
    assert_eq!(total_minutes(&merged), 480);
}

#[test]
fn night_shift_extends_past_midnight() {
    let merged = merge(&[iv(Weekday::Fri, "22:00", "06:00"), iv(Weekday::Fri, "20:00", "23:00")]);
    assert_eq!(merged, vec![block(Weekday::Fri, 1200, 1800)]);
    assert_eq!(total_minutes(&merged), 600);
}

#[test]
fn merging_merged_blocks_changes_nothing() {
    let once = merge(&[
        iv(Weekday::Mon, "09:00", "13:00"),
        iv(Weekday::Mon, "12:00", "15:00"),
        iv(Weekday::Sat, "10:00", "11:00"),
    ]);
    assert_eq!(merge_blocks(&once), once);
    assert!(merge(&[]).is_empty());
}

#[test]
fn runs_keep_their_members() {
    let items = [
        iv(Weekday::Mon, "09:00", "13:00"),
        iv(Weekday::Mon, "13:00", "17:00"),
        iv(Weekday::Mon, "18:00", "19:00"),
    ];
    let runs = merge_with(&items, |i| Block::from(i));
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].members.len(), 2);
    assert_eq!(runs[1].members, vec![&items[2]]);
}
