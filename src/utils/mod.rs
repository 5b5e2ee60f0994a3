//! Some utility functions

use chrono::TimeZone;

use crate::calendar::{MonthGrid, WEEKDAY_NAMES};
use crate::category::Category;
use crate::task::Task;

pub mod comparison;

/// A debug utility that pretty-prints a list of tasks
pub fn print_task_list<'a, I, Tz>(tasks: I, categories: &[Category], tz: &Tz)
where
    I: IntoIterator<Item = &'a Task>,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    for task in tasks {
        print_task(task, categories, tz);
    }
}

pub fn print_task<Tz>(task: &Task, categories: &[Category], tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let completion = if task.completed() { "✓" } else { " " };
    let category = task.category_id()
        .map(|id| {
            categories.iter()
                .find(|c| c.id() == id)
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| format!("?{}", id))
        })
        .unwrap_or_default();
    let date = task.date().with_timezone(tz).format("%Y-%m-%d %H:%M");

    println!("    {} {}  {:<6} {:<40} {:<10} {}", completion, date, task.priority().as_str(), task.title(), category, task.id());
}

/// A debug utility that pretty-prints a month grid.
///
/// Days of the adjacent months are shown in parentheses, days in `marked` get a star
pub fn print_month_grid(grid: &MonthGrid, marked: &std::collections::BTreeSet<chrono::NaiveDate>) {
    use chrono::Datelike;

    println!("{:^35}", grid.month().to_string());
    println!("{}", WEEKDAY_NAMES.iter().map(|name| format!("{:^5}", name)).collect::<String>());
    for week in grid.weeks() {
        let line: String = week.iter()
            .map(|day| {
                let star = if marked.contains(&day.date()) { "*" } else { " " };
                if day.in_month() {
                    format!(" {:>2}{} ", day.date().day(), star)
                } else {
                    format!("({:>2}){}", day.date().day(), star)
                }
            })
            .collect();
        println!("{}", line);
    }
}
