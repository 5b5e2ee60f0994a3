//! To-do tasks

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use csscolorparser::Color;

use crate::category::CategoryId;

/// The identifier of a [`Task`].
///
/// This is an opaque string. The store never generates it, callers are responsible for providing unique values
/// (e.g. with [`TaskId::random`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// How urgent a task is.
///
/// Variants are ordered, so that `Low < Medium < High`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// The color this priority is displayed with
    pub fn color(&self) -> Color {
        let hex = match self {
            Priority::Low => "#4CAF50",
            Priority::Medium => "#FF9800",
            Priority::High => "#F44336",
        };
        csscolorparser::parse(hex).unwrap(/* these are valid hardcoded colors */)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Invalid priority {:?} (expected low, medium or high)", other)),
        }
    }
}



/// A to-do task
///
/// Its JSON form is the persisted one: `id`, `title`, `description`, `date`, `priority`, `categoryId` and `completed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// The task ID. It never changes once the task is created
    id: TaskId,

    /// The display name of the task
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// The time this task is scheduled for.
    /// Its local calendar day decides in which day (and month) the task is displayed
    date: DateTime<Utc>,

    #[serde(default)]
    priority: Priority,
    /// A weak reference to a [`Category`](crate::category::Category). `None` means "uncategorized"
    #[serde(default)]
    category_id: Option<CategoryId>,
    #[serde(default)]
    completed: bool,
}

impl Task {
    /// Create a brand new, uncompleted Task with a medium priority and no category.
    /// This will pick a new (random) task ID.
    pub fn new(title: String, date: DateTime<Utc>) -> Self {
        Self::new_with_parameters(TaskId::random(), title, None, date, Priority::default(), None, false)
    }

    /// Create a new Task instance, with every field given
    pub fn new_with_parameters(id: TaskId, title: String, description: Option<String>,
                               date: DateTime<Utc>, priority: Priority,
                               category_id: Option<CategoryId>, completed: bool,
                            ) -> Self
    {
        Self {
            id,
            title,
            description,
            date,
            priority,
            category_id,
            completed,
        }
    }

    pub fn id(&self) -> &TaskId         { &self.id           }
    pub fn title(&self) -> &str         { &self.title        }
    pub fn date(&self) -> &DateTime<Utc> { &self.date        }
    pub fn priority(&self) -> Priority  { self.priority      }
    pub fn completed(&self) -> bool     { self.completed     }
    pub fn description(&self) -> Option<&str>           { self.description.as_deref() }
    pub fn category_id(&self) -> Option<&CategoryId>    { self.category_id.as_ref() }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    /// Set the description. Empty descriptions are stored as `None`
    pub fn set_description(&mut self, new_description: Option<String>) {
        self.description = new_description.filter(|d| d.is_empty() == false);
    }

    pub fn set_date(&mut self, new_date: DateTime<Utc>) {
        self.date = new_date;
    }

    pub fn set_priority(&mut self, new_priority: Priority) {
        self.priority = new_priority;
    }

    pub fn set_category(&mut self, new_category: Option<CategoryId>) {
        self.category_id = new_category;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flip the completion status
    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserialize_with_defaults() {
        let json = r#"{"id":"abc","title":"Buy milk","date":"2024-03-15T10:30:00.000Z","categoryId":null}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id(), &TaskId::from("abc"));
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), None);
        assert_eq!(task.date(), &Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap());
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.category_id(), None);
        assert_eq!(task.completed(), false);
    }

    #[test]
    fn serialized_field_names() {
        let task = Task::new_with_parameters(
            TaskId::from("t1"), "Run".to_string(), Some("5km".to_string()),
            Utc.with_ymd_and_hms(2024, 3, 15, 7, 0, 0).unwrap(), Priority::High,
            Some(CategoryId::from("4")), true);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["description"], "5km");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["categoryId"], "4");
        assert_eq!(value["completed"], true);
        assert!(value.get("category_id").is_none());
    }

    #[test]
    fn toggle_and_setters() {
        let mut task = Task::new("Call mom".to_string(), Utc::now());
        assert_eq!(task.completed(), false);
        task.toggle_completion();
        assert_eq!(task.completed(), true);
        task.toggle_completion();
        assert_eq!(task.completed(), false);

        task.set_description(Some(String::new()));
        assert_eq!(task.description(), None);
    }

    #[test]
    fn priority_order_and_parsing() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.color().to_hex_string(), "#4caf50");
    }
}
