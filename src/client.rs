//! This module provides a client for the remote task API
//!
//! The remote API is a plain REST collection of tasks (list, get, create, update, delete).
//! It is a stand-alone data source: nothing here reads or writes the local [`TaskStore`](crate::store::TaskStore),
//! and no synchronisation between both is performed.

use std::error::Error;

use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use url::Url;

use crate::task::{Priority, Task};

/// Name of the collection, appended to the base URL
const TASKS_COLLECTION: &str = "task";

/// A task, as the remote API represents it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    /// Assigned by the server. Leave it `None` when creating a task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// The API sends either `""` or `null` for tasks without a description
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// A category ID
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&Task> for RemoteTask {
    fn from(task: &Task) -> Self {
        Self {
            id: None,
            title: task.title().trim().to_string(),
            description: task.description().unwrap_or_default().trim().to_string(),
            priority: task.priority(),
            category: task.category_id().map(|c| c.to_string()),
            completed: task.completed(),
            created_at: Some(Utc::now()),
        }
    }
}


/// A client of the remote task API
#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base URL", base_url).into());
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the URL given by [`crate::config::API_URL`]
    pub fn from_config() -> Result<Self, Box<dyn Error>> {
        Self::new(crate::config::get(&crate::config::API_URL))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The URL of the task collection
    pub fn collection_url(&self) -> Url {
        self.url_with_segments(&[TASKS_COLLECTION])
    }

    /// The URL of a single task
    pub fn task_url(&self, id: &str) -> Url {
        self.url_with_segments(&[TASKS_COLLECTION, id])
    }

    fn url_with_segments(&self, new_segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(new_segments);
        }
        url
    }

    /// Fetch every task of the remote collection
    pub async fn list_tasks(&self) -> Result<Vec<RemoteTask>, Box<dyn Error>> {
        let response = self.http
            .get(self.collection_url())
            .send()
            .await?;
        let response = check_status(response)?;
        let tasks: Vec<RemoteTask> = response.json().await?;
        log::debug!("Fetched {} remote tasks", tasks.len());
        Ok(tasks)
    }

    pub async fn get_task(&self, id: &str) -> Result<RemoteTask, Box<dyn Error>> {
        let response = self.http
            .get(self.task_url(id))
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    /// Create a task on the server. Returns the task as created by the server (i.e. with its ID)
    pub async fn create_task(&self, task: &RemoteTask) -> Result<RemoteTask, Box<dyn Error>> {
        let response = self.http
            .post(self.collection_url())
            .json(task)
            .send()
            .await?;
        let response = check_status(response)?;
        let created: RemoteTask = response.json().await?;
        log::info!("Created remote task {:?}", created.id);
        Ok(created)
    }

    pub async fn update_task(&self, id: &str, task: &RemoteTask) -> Result<RemoteTask, Box<dyn Error>> {
        let response = self.http
            .put(self.task_url(id))
            .json(task)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), Box<dyn Error>> {
        let response = self.http
            .delete(self.task_url(id))
            .send()
            .await?;
        check_status(response)?;
        log::info!("Deleted remote task {}", id);
        Ok(())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Box<dyn Error>> {
    if response.status().is_success() == false {
        return Err(format!("Unexpected HTTP status code {:?} for {}", response.status(), response.url()).into());
    }
    Ok(response)
}


#[cfg(test)]
mod test {
    use super::*;

    use chrono::TimeZone;
    use crate::category::CategoryId;
    use crate::task::TaskId;

    #[test]
    fn collection_urls() {
        let client = Client::new("https://example.com/api/v1").unwrap();
        assert_eq!(client.collection_url().as_str(), "https://example.com/api/v1/task");
        assert_eq!(client.task_url("12").as_str(), "https://example.com/api/v1/task/12");

        let trailing = Client::new("https://example.com/api/v1/").unwrap();
        assert_eq!(trailing.collection_url().as_str(), "https://example.com/api/v1/task");

        assert!(Client::new("not a url").is_err());
        assert!(Client::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn parse_remote_tasks() {
        let body = r#"[
            {"id":"1","title":"Write report","description":"","priority":"high","category":"1","completed":false,"createdAt":"2025-05-25T14:10:00.000Z"},
            {"id":"2","title":"Bare task"},
            {"id":"3","title":"Null description","description":null}
        ]"#;
        let tasks: Vec<RemoteTask> = serde_json::from_str(body).unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category.as_deref(), Some("1"));
        assert_eq!(tasks[0].created_at, Some(Utc.with_ymd_and_hms(2025, 5, 25, 14, 10, 0).unwrap()));
        assert_eq!(tasks[1].priority, Priority::Medium);
        assert_eq!(tasks[1].completed, false);
        assert_eq!(tasks[1].description, "");
        assert_eq!(tasks[2].description, "");
    }

    #[test]
    fn from_local_task() {
        let task = Task::new_with_parameters(
            TaskId::from("local"), " Water plants ".to_string(), Some("balcony".to_string()),
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(), Priority::Low,
            Some(CategoryId::from("2")), false);
        let remote = RemoteTask::from(&task);

        assert_eq!(remote.id, None);
        assert_eq!(remote.title, "Water plants");
        assert_eq!(remote.description, "balcony");
        assert_eq!(remote.category.as_deref(), Some("2"));

        let json = serde_json::to_value(&remote).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
