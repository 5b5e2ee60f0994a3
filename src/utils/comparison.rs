//! Utilities to compare tasks
//!
//! These can be used to sort results, e.g. by using `sorted_by` from the `itertools` crate

use std::cmp::Ordering;

use itertools::Itertools;

use crate::task::Task;

/// Compare tasks by scheduled time
pub fn compare_tasks_by_date(left: &&Task, right: &&Task) -> Ordering {
    Ord::cmp(left.date(), right.date())
}

/// Compare tasks by priority (highest first), then by scheduled time
pub fn compare_tasks_by_priority(left: &&Task, right: &&Task) -> Ordering {
    Ord::cmp(&right.priority(), &left.priority())
        .then_with(|| compare_tasks_by_date(left, right))
}

/// Compare tasks alphabetically
pub fn compare_tasks_alpha(left: &&Task, right: &&Task) -> Ordering {
    Ord::cmp(&left.title().to_lowercase(), &right.title().to_lowercase())
}


/// How a list of tasks should be ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// The order the tasks were added in
    Added,
    Date,
    Priority,
    Title,
}

impl SortOrder {
    /// Returns the tasks in this order. The sort is stable
    pub fn sort<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let tasks = tasks.into_iter();
        match self {
            SortOrder::Added => tasks.collect(),
            SortOrder::Date => tasks.sorted_by(compare_tasks_by_date).collect(),
            SortOrder::Priority => tasks.sorted_by(compare_tasks_by_priority).collect(),
            SortOrder::Title => tasks.sorted_by(compare_tasks_alpha).collect(),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" => Ok(SortOrder::Added),
            "date" => Ok(SortOrder::Date),
            "priority" => Ok(SortOrder::Priority),
            "title" => Ok(SortOrder::Title),
            other => Err(format!("Invalid sort order {:?} (expected added, date, priority or title)", other)),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::task::{Priority, TaskId};

    fn task(title: &str, hour: u32, priority: Priority) -> Task {
        Task::new_with_parameters(TaskId::from(title), title.to_string(), None,
            Utc.with_ymd_and_hms(2024, 3, 15, hour, 0, 0).unwrap(), priority, None, false)
    }

    #[test]
    fn sorting() {
        let tasks = vec![
            task("b", 9, Priority::Low),
            task("A", 11, Priority::High),
            task("c", 8, Priority::High),
        ];

        let by_date: Vec<&str> = tasks.iter().sorted_by(compare_tasks_by_date).map(|t| t.title()).collect();
        assert_eq!(by_date, vec!["c", "b", "A"]);

        let by_priority: Vec<&str> = tasks.iter().sorted_by(compare_tasks_by_priority).map(|t| t.title()).collect();
        assert_eq!(by_priority, vec!["c", "A", "b"]);

        let alpha: Vec<&str> = tasks.iter().sorted_by(compare_tasks_alpha).map(|t| t.title()).collect();
        assert_eq!(alpha, vec!["A", "b", "c"]);
    }

    #[test]
    fn sort_orders() {
        let tasks = vec![
            task("b", 9, Priority::Low),
            task("A", 11, Priority::High),
            task("c", 8, Priority::High),
        ];
        let titles = |order: SortOrder| {
            order.sort(&tasks).into_iter().map(|t| t.title()).collect::<Vec<_>>()
        };

        assert_eq!(titles(SortOrder::Added), vec!["b", "A", "c"]);
        assert_eq!(titles(SortOrder::Date), vec!["c", "b", "A"]);
        assert_eq!(titles("Priority".parse().unwrap()), vec!["c", "A", "b"]);
        assert_eq!(titles(SortOrder::Title), vec!["A", "b", "c"]);
        assert!("size".parse::<SortOrder>().is_err());
    }
}
