use chrono::{Datelike, Duration, NaiveDate};

use super::time::Weekday;

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_from_monday as i64)
}

/// The displayed calendar week, always anchored on a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: week_start(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn date_of(&self, day: Weekday) -> NaiveDate {
        self.start + Duration::days(day.index() as i64)
    }

    pub fn dates(&self) -> [NaiveDate; 7] {
        Weekday::ALL.map(|day| self.date_of(day))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// Jumps to `month` (1-12) keeping the day of month, clamped to the
    /// month's length, then snaps back to that week's Monday.
    pub fn with_month(&self, month: u32) -> Self {
        Self::containing(clamped_date(self.start.year(), month, self.start.day()))
    }

    pub fn with_year(&self, year: i32) -> Self {
        Self::containing(clamped_date(year, self.start.month(), self.start.day()))
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %-d"),
            self.end().format("%b %-d, %Y")
        )
    }
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let month = month.clamp(1, 12);
    (1..=day.clamp(1, 31))
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .unwrap_or(NaiveDate::MIN)
}
