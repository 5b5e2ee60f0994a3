//! Date bucketing of tasks, for daily and monthly views
//!
//! A task belongs to the calendar day its timestamp falls on *in the time zone of the reference date* the caller passes
//! (usually `chrono::Local::now()`, or a date picked on a calendar). Days are never computed from the UTC date, otherwise
//! a task due late in the evening would show up on the next day for users west of Greenwich (and the other way round).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use itertools::Itertools;

use crate::task::Task;

pub mod month_grid;
pub use month_grid::{CalendarDay, Month, MonthGrid, WEEKDAY_NAMES};

/// The calendar day of a moment, as seen in the time zone `tz`
pub fn local_day<Tz: TimeZone>(moment: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    moment.with_timezone(tz).date_naive()
}

/// Whether `moment` falls on the same calendar day as `reference`, in `reference`'s time zone.
///
/// Times of day are ignored.
pub fn same_day<Tz: TimeZone>(moment: &DateTime<Utc>, reference: &DateTime<Tz>) -> bool {
    local_day(moment, &reference.timezone()) == reference.date_naive()
}

/// Returns the tasks scheduled on the same calendar day as `date`, in their original order
pub fn tasks_on_date<'a, I, Tz>(tasks: I, date: &DateTime<Tz>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    tasks.into_iter()
        .filter(|task| same_day(task.date(), date))
        .collect()
}

/// Whether at least one task is scheduled on the same calendar day as `date`
pub fn has_task_on_date<'a, I, Tz>(tasks: I, date: &DateTime<Tz>) -> bool
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    tasks.into_iter()
        .any(|task| same_day(task.date(), date))
}

/// Returns the tasks scheduled on a given day, as seen in the time zone `tz`
pub fn tasks_on_day<'a, I, Tz>(tasks: I, day: NaiveDate, tz: &Tz) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    tasks.into_iter()
        .filter(|task| local_day(task.date(), tz) == day)
        .collect()
}

/// Returns the tasks scheduled on the day of `now`, or later (earlier times on the same day are included)
pub fn tasks_on_or_after<'a, I, Tz>(tasks: I, now: &DateTime<Tz>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    let today = now.date_naive();
    let tz = now.timezone();
    tasks.into_iter()
        .filter(|task| local_day(task.date(), &tz) >= today)
        .collect()
}

/// Groups tasks by calendar day (as seen in the time zone `tz`).
///
/// Every bucket is sorted by time of day. Tasks scheduled at the same time keep their original order
pub fn tasks_by_day<'a, I, Tz>(tasks: I, tz: &Tz) -> BTreeMap<NaiveDate, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
{
    tasks.into_iter()
        .into_group_map_by(|task| local_day(task.date(), tz))
        .into_iter()
        .map(|(day, bucket)| {
            let sorted = bucket.into_iter()
                .sorted_by_key(|task| *task.date())
                .collect();
            (day, sorted)
        })
        .collect()
}

/// The `n` consecutive days that start with the day of `from`
pub fn upcoming_days<Tz: TimeZone>(from: &DateTime<Tz>, n: usize) -> Vec<NaiveDate> {
    from.date_naive()
        .iter_days()
        .take(n)
        .collect()
}
