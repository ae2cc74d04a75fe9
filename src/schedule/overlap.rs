use super::error::ScheduleError;
use super::interval::Interval;
use super::time::{TimeOfDay, Weekday};

/// Strict intersection on the same weekday. Spans that only share an
/// endpoint do not overlap.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.day == b.day
        && b.start_min() < a.effective_end_min()
        && b.effective_end_min() > a.start_min()
}

pub fn find_overlap<'a, I>(candidate: &Interval, existing: I) -> Option<&'a Interval>
where
    I: IntoIterator<Item = &'a Interval>,
{
    existing.into_iter().find(|e| overlaps(candidate, e))
}

pub fn has_overlap(candidate: &Interval, existing: &[Interval]) -> bool {
    find_overlap(candidate, existing).is_some()
}

/// Builds one interval per selected day and rejects the whole proposal if
/// any of them is degenerate or collides with `existing`.
pub fn validate_proposal(
    days: &[Weekday],
    start: TimeOfDay,
    end: TimeOfDay,
    existing: &[Interval],
) -> Result<Vec<Interval>, ScheduleError> {
    if days.is_empty() {
        return Err(ScheduleError::MissingField("days"));
    }

    let mut accepted = Vec::with_capacity(days.len());
    for &day in days {
        let candidate = Interval::checked(day, start, end)?;
        if let Some(conflict) = find_overlap(&candidate, existing) {
            return Err(ScheduleError::Overlap {
                day: conflict.day,
                start: conflict.start,
                end: conflict.end,
            });
        }
        accepted.push(candidate);
    }
    Ok(accepted)
}
