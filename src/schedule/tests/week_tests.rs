use crate::schedule::{week_start, Week, Weekday};

use super::{date, sample_week};

#[test]
fn weeks_start_on_monday() {
    assert_eq!(week_start(date(2026, 2, 12)), date(2026, 2, 9));
    assert_eq!(week_start(date(2026, 2, 15)), date(2026, 2, 9));
    assert_eq!(week_start(date(2026, 2, 9)), date(2026, 2, 9));
}

#[test]
fn week_maps_weekdays_to_dates() {
    let week = sample_week();
    assert_eq!(week.date_of(Weekday::Mon), date(2026, 2, 9));
    assert_eq!(week.date_of(Weekday::Sun), date(2026, 2, 15));
    assert_eq!(week.end(), date(2026, 2, 15));
    assert_eq!(week.dates()[1], date(2026, 2, 10));
    assert!(week.contains(date(2026, 2, 15)));
    assert!(!week.contains(date(2026, 2, 16)));
    assert!(!week.contains(date(2026, 2, 8)));
}

#[test]
fn stepping_moves_seven_days() {
    let week = sample_week();
    assert_eq!(week.next().start(), date(2026, 2, 16));
    assert_eq!(week.previous().start(), date(2026, 2, 2));
    assert_eq!(week.next().previous(), week);
}

#[test]
fn month_and_year_jumps_snap_to_monday() {
    let week = sample_week();
    // Jan 9 2026 is a Friday.
    assert_eq!(week.with_month(1).start(), date(2026, 1, 5));
    // Mar 30 -> Feb 28 (clamped), a Saturday.
    assert_eq!(Week::containing(date(2026, 3, 30)).with_month(2).start(), date(2026, 2, 23));
    assert_eq!(week.with_year(2027).start(), date(2027, 2, 8));
}

#[test]
fn label_spans_the_week() {
    assert_eq!(sample_week().label(), "Feb 9 - Feb 15, 2026");
}
