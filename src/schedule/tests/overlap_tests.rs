use crate::schedule::{has_overlap, overlaps, validate_proposal, ScheduleError, Weekday};

use super::{iv, t};

#[test]
fn shared_endpoint_is_not_an_overlap() {
    let a = iv(Weekday::Mon, "09:00", "13:00");
    let b = iv(Weekday::Mon, "13:00", "17:00");
    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
}

#[test]
fn intersecting_spans_overlap_both_ways() {
    let a = iv(Weekday::Mon, "09:00", "14:00");
    let b = iv(Weekday::Mon, "13:00", "17:00");
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
    assert!(!overlaps(&a, &iv(Weekday::Tue, "13:00", "17:00")));
}

#[test]
fn night_shift_overlaps_late_evening() {
    let night = iv(Weekday::Thu, "22:00", "06:00");
    assert!(has_overlap(&iv(Weekday::Thu, "23:00", "23:30"), &[night]));
    assert!(!has_overlap(&iv(Weekday::Thu, "18:00", "22:00"), &[night]));
}

#[test]
fn proposal_builds_one_interval_per_day() {
    let accepted = validate_proposal(&[Weekday::Mon, Weekday::Wed], t("09:00"), t("13:00"), &[]).unwrap();
    assert_eq!(
        accepted,
        vec![iv(Weekday::Mon, "09:00", "13:00"), iv(Weekday::Wed, "09:00", "13:00")]
    );
}

#[test]
fn one_conflicting_day_rejects_the_whole_proposal() {
    let existing = [iv(Weekday::Tue, "10:00", "12:00")];
    let err = validate_proposal(&[Weekday::Mon, Weekday::Tue], t("09:00"), t("13:00"), &existing).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Overlap {
            day: Weekday::Tue,
            start: t("10:00"),
            end: t("12:00"),
        }
    );
}

#[test]
fn empty_or_degenerate_proposals_fail() {
    assert_eq!(
        validate_proposal(&[], t("09:00"), t("13:00"), &[]),
        Err(ScheduleError::MissingField("days"))
    );
    assert_eq!(
        validate_proposal(&[Weekday::Mon], t("09:00"), t("09:00"), &[]),
        Err(ScheduleError::DegenerateInterval(t("09:00")))
    );
}
