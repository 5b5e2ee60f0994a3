//! Month grids, as displayed by a calendar view

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, Duration, NaiveDate, TimeZone};

use crate::task::Task;
use super::local_day;

/// Column headers of a [`MonthGrid`]. Weeks start on Sunday
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A month of a given year
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    /// 1 to 12
    month: u32,
}

impl Month {
    /// Returns `None` in case `month` is not in `1..=12`, or in case the grid of this month
    /// (padded to whole weeks) does not fit in the range of dates chrono supports
    pub fn new(year: i32, month: u32) -> Option<Self> {
        grid_bounds(year, month)?;
        Some(Self { year, month })
    }

    /// The month a date belongs to. `None` for the few months at the edges of chrono's range
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap(/* checked at creation */)
    }

    pub fn last_day(&self) -> NaiveDate {
        last_day_of(self.year, self.month).unwrap(/* checked at creation */)
    }

    pub fn n_days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Option<Self> {
        match self.month {
            1 => Self::new(self.year.checked_sub(1)?, 12),
            m => Self::new(self.year, m - 1),
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self.month {
            12 => Self::new(self.year.checked_add(1)?, 1),
            m => Self::new(self.year, m + 1),
        }
    }
}

fn last_day_of(year: i32, month: u32) -> Option<NaiveDate> {
    let next_first = match month {
        12 => year.checked_add(1).and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
        m => NaiveDate::from_ymd_opt(year, m + 1, 1),
    };
    match next_first {
        Some(d) => d.pred_opt(),
        // December of the last year chrono supports
        None if month == 12 => NaiveDate::from_ymd_opt(year, 12, 31),
        None => None,
    }
}

/// The Sunday on or before the first day of a month, and the Saturday on or after its last day
fn grid_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = last_day_of(year, month)?;
    let start = first.checked_sub_signed(Duration::days(first.weekday().num_days_from_sunday() as i64))?;
    let end = last.checked_add_signed(Duration::days(6 - last.weekday().num_days_from_sunday() as i64))?;
    Some((start, end))
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}


/// A cell of a [`MonthGrid`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    date: NaiveDate,
    in_month: bool,
}

impl CalendarDay {
    pub fn date(&self) -> NaiveDate { self.date }
    /// Whether this day belongs to the month of the grid (rather than being a leading or trailing day of an adjacent month)
    pub fn in_month(&self) -> bool { self.in_month }
}


/// The days to display for a month: whole Sunday-first weeks, from the week of the first day of the month
/// to the week of its last day.
///
/// Leading and trailing days from the adjacent months are included, and flagged as such.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    month: Month,
    days: Vec<CalendarDay>,
}

impl MonthGrid {
    pub fn new(month: Month) -> Self {
        let (start, end) = grid_bounds(month.year, month.month).unwrap(/* checked at creation */);

        let days = start.iter_days()
            .take_while(|date| *date <= end)
            .map(|date| CalendarDay { date, in_month: month.contains(date) })
            .collect();

        Self { month, days }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// Every day of the grid, row after row
    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    /// The rows of the grid, 7 days each
    pub fn weeks(&self) -> Vec<&[CalendarDay]> {
        self.days.chunks(7).collect()
    }

    pub fn n_weeks(&self) -> usize {
        self.days.len() / 7
    }

    /// Whether a date has a cell in this grid (including the days of the adjacent months)
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => first.date <= date && date <= last.date,
            _ => false,
        }
    }

    /// The dates of this grid that have at least one task, as seen in the time zone `tz`
    pub fn days_with_tasks<'a, I, Tz>(&self, tasks: I, tz: &Tz) -> BTreeSet<NaiveDate>
    where
        I: IntoIterator<Item = &'a Task>,
        Tz: TimeZone,
    {
        tasks.into_iter()
            .map(|task| local_day(task.date(), tz))
            .filter(|date| self.contains(*date))
            .collect()
    }
}
