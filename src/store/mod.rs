//! The local task store
//!
//! A [`TaskStore`] is the single owner of the task list (and of the fixed category list) for a session.
//! It loads the task list once from a [`Storage`] when it is created, and writes the whole list back after every change.

use thiserror::Error;

use crate::category::{default_categories, Category, CategoryId};
use crate::config::StoreConfig;
use crate::storage::Storage;
use crate::task::{Task, TaskId};

pub mod feedback;
use feedback::{Feedback, FeedbackSender, StoreEvent};

/// Errors returned by the mutating operations of a [`TaskStore`]
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("a task must have a non-empty title")]
    EmptyTitle,
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),
    #[error("a task with ID {0} already exists")]
    DuplicateId(TaskId),
    #[error("no task with ID {0}")]
    NotFound(TaskId),
    /// The change has been applied in memory, but could not be persisted
    #[error("the change was applied but not saved: {0}")]
    Persistence(String),
}

impl StoreError {
    /// Whether the operation was rejected, i.e. it has changed nothing, neither in memory nor in the storage
    pub fn is_rejection(&self) -> bool {
        match self {
            StoreError::Persistence(_) => false,
            _ => true,
        }
    }
}


/// The authoritative list of tasks of a session, kept in sync with a [`Storage`]
#[derive(Debug)]
pub struct TaskStore<S: Storage> {
    storage: S,
    config: StoreConfig,

    tasks: Vec<Task>,
    categories: Vec<Category>,

    feedback: Feedback,
}

impl<S: Storage> TaskStore<S> {
    /// Create a store and load the tasks previously persisted in `storage`.
    ///
    /// This never fails: a missing, unreadable or malformed payload starts an empty list (failures are logged)
    pub async fn load(storage: S) -> Self {
        Self::load_with_config(storage, StoreConfig::default(), None).await
    }

    /// Same as [`Self::load`], and send every persistence event to `feedback_sender`
    pub async fn load_with_feedback(storage: S, feedback_sender: FeedbackSender) -> Self {
        Self::load_with_config(storage, StoreConfig::default(), Some(feedback_sender)).await
    }

    /// Create a store with custom settings
    pub async fn load_with_config(storage: S, config: StoreConfig, feedback_sender: Option<FeedbackSender>) -> Self {
        let mut store = Self {
            storage,
            config,
            tasks: Vec::new(),
            categories: default_categories(),
            feedback: Feedback::new(feedback_sender),
        };
        store.tasks = store.load_tasks().await;
        store
    }

    async fn load_tasks(&mut self) -> Vec<Task> {
        let payload = match self.storage.get_item(&self.config.tasks_key).await {
            Err(err) => {
                self.feedback.send(StoreEvent::LoadFailed{ details: err.to_string() });
                return Vec::new();
            },
            Ok(None) => {
                log::debug!("Nothing stored under {:?}, starting with an empty list", self.config.tasks_key);
                self.feedback.send(StoreEvent::Loaded{ n_tasks: 0 });
                return Vec::new();
            },
            Ok(Some(payload)) => payload,
        };

        match serde_json::from_str::<Vec<Task>>(&payload) {
            Err(err) => {
                self.feedback.send(StoreEvent::LoadFailed{ details: format!("invalid payload: {}", err) });
                Vec::new()
            },
            Ok(tasks) => {
                warn_about_duplicates(&tasks);
                self.feedback.send(StoreEvent::Loaded{ n_tasks: tasks.len() });
                tasks
            },
        }
    }

    /// Returns the backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// How many loads or saves have failed since this store was created
    pub fn n_persistence_failures(&self) -> u32 {
        self.feedback.n_failures()
    }

    /// The tasks, in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id() == id)
    }

    /// Tasks tagged with a given category, in insertion order
    pub fn tasks_in_category(&self, id: &CategoryId) -> Vec<&Task> {
        self.tasks.iter()
            .filter(|t| t.category_id() == Some(id))
            .collect()
    }

    /// Tasks that have no category, in insertion order
    pub fn uncategorized_tasks(&self) -> Vec<&Task> {
        self.tasks.iter()
            .filter(|t| t.category_id().is_none())
            .collect()
    }

    pub fn task_count_in_category(&self, id: &CategoryId) -> usize {
        self.tasks.iter()
            .filter(|t| t.category_id() == Some(id))
            .count()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    fn validate(&self, task: &Task) -> Result<(), StoreError> {
        if task.title().trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if let Some(cat_id) = task.category_id() {
            if self.category(cat_id).is_none() {
                return Err(StoreError::UnknownCategory(cat_id.clone()));
            }
        }
        Ok(())
    }

    /// Append a task at the end of the list, then save the list.
    ///
    /// The task is rejected in case its title is empty, its category is unknown, or its ID is already used
    pub async fn add_task(&mut self, task: Task) -> Result<(), StoreError> {
        self.validate(&task)?;
        if self.position(task.id()).is_some() {
            return Err(StoreError::DuplicateId(task.id().clone()));
        }

        log::debug!("Adding task {} ({})", task.id(), task.title());
        self.tasks.push(task);
        self.save().await
    }

    /// Replace the task that has the same ID as `task` (it keeps its position in the list), then save the list
    pub async fn update_task(&mut self, task: Task) -> Result<(), StoreError> {
        self.validate(&task)?;
        let index = self.position(task.id())
            .ok_or_else(|| StoreError::NotFound(task.id().clone()))?;

        log::debug!("Updating task {}", task.id());
        self.tasks[index] = task;
        self.save().await
    }

    /// Remove a task, then save the list
    pub async fn delete_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let index = self.position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        log::debug!("Deleting task {}", id);
        self.tasks.remove(index);
        self.save().await
    }

    /// Flip the completion status of a task, then save the list
    pub async fn toggle_task_completion(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let index = self.position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let task = &mut self.tasks[index];
        task.toggle_completion();
        log::debug!("Task {} is now {}", id, if task.completed() { "completed" } else { "uncompleted" });
        self.save().await
    }

    /// Remove every task.
    ///
    /// This removes the persisted payload altogether (rather than saving an empty list), so that it also gets rid of corrupt stored data
    pub async fn clear_all_tasks(&mut self) -> Result<(), StoreError> {
        log::info!("Clearing {} tasks", self.tasks.len());
        self.tasks.clear();

        match self.storage.remove_item(&self.config.tasks_key).await {
            Ok(()) => {
                self.feedback.send(StoreEvent::Cleared);
                Ok(())
            },
            Err(err) => self.save_failed(err.to_string()),
        }
    }

    /// Write the whole task list to the storage
    async fn save(&mut self) -> Result<(), StoreError> {
        let payload = match serde_json::to_string(&self.tasks) {
            Ok(p) => p,
            Err(err) => return self.save_failed(format!("unable to serialize: {}", err)),
        };

        match self.storage.set_item(&self.config.tasks_key, &payload).await {
            Ok(()) => {
                self.feedback.send(StoreEvent::Saved{ n_tasks: self.tasks.len() });
                Ok(())
            },
            Err(err) => self.save_failed(err.to_string()),
        }
    }

    fn save_failed(&mut self, details: String) -> Result<(), StoreError> {
        self.feedback.send(StoreEvent::SaveFailed{ details: details.clone() });
        Err(StoreError::Persistence(details))
    }
}

fn warn_about_duplicates(tasks: &[Task]) {
    let mut seen = std::collections::HashSet::new();
    for task in tasks {
        if seen.insert(task.id()) == false {
            log::warn!("Stored tasks contain the ID {} several times", task.id());
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    use std::sync::{Arc, Mutex};
    use chrono::{TimeZone, Utc};

    use crate::mock_behaviour::MockBehaviour;
    use crate::storage::MemoryStorage;
    use crate::task::Priority;

    fn sample_task(id: &str, title: &str) -> Task {
        Task::new_with_parameters(TaskId::from(id), title.to_string(), None,
            Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(), Priority::Medium, None, false)
    }

    #[tokio::test]
    async fn add_appends_and_persists() {
        let _ = env_logger::builder().is_test(true).try_init();

        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone()).await;
        assert!(store.is_empty());
        assert_eq!(store.categories().len(), 5);

        store.add_task(sample_task("a", "First")).await.unwrap();
        store.add_task(sample_task("b", "Second")).await.unwrap();

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let persisted: Vec<Task> = serde_json::from_str(&storage.raw_item("tasks").unwrap()).unwrap();
        assert_eq!(persisted, store.tasks());
    }

    #[tokio::test]
    async fn rejected_tasks_change_nothing() {
        let _ = env_logger::builder().is_test(true).try_init();

        let storage = MemoryStorage::new();
        let mut store = TaskStore::load(storage.clone()).await;
        store.add_task(sample_task("a", "First")).await.unwrap();
        let before = storage.raw_item("tasks");

        assert_eq!(store.add_task(sample_task("a", "Again")).await, Err(StoreError::DuplicateId(TaskId::from("a"))));
        assert_eq!(store.add_task(sample_task("b", "   ")).await, Err(StoreError::EmptyTitle));

        let mut bad_category = sample_task("c", "Groceries");
        bad_category.set_category(Some(CategoryId::from("42")));
        assert_eq!(store.add_task(bad_category).await, Err(StoreError::UnknownCategory(CategoryId::from("42"))));

        assert_eq!(store.len(), 1);
        assert_eq!(store.task(&TaskId::from("a")).unwrap().title(), "First");
        assert_eq!(storage.raw_item("tasks"), before);
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let mut store = TaskStore::load(MemoryStorage::new()).await;
        for id in &["a", "b", "c"] {
            store.add_task(sample_task(id, "Task")).await.unwrap();
        }

        let mut changed = store.task(&TaskId::from("b")).unwrap().clone();
        changed.set_title("Renamed".to_string());
        changed.set_priority(Priority::High);
        changed.set_category(Some(CategoryId::from("2")));
        store.update_task(changed.clone()).await.unwrap();

        assert_eq!(store.tasks()[1], changed);
        assert_eq!(store.tasks_in_category(&CategoryId::from("2")), vec![&changed]);
        assert_eq!(store.task_count_in_category(&CategoryId::from("1")), 0);
        assert_eq!(store.uncategorized_tasks().len(), 2);

        let missing = sample_task("zzz", "Nope");
        assert_eq!(store.update_task(missing).await, Err(StoreError::NotFound(TaskId::from("zzz"))));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn delete_and_toggle() {
        let mut store = TaskStore::load(MemoryStorage::new()).await;
        for id in &["a", "b", "c"] {
            store.add_task(sample_task(id, "Task")).await.unwrap();
        }

        store.delete_task(&TaskId::from("b")).await.unwrap();
        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let err = store.delete_task(&TaskId::from("b")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(TaskId::from("b")));
        assert!(err.is_rejection());
        assert_eq!(store.len(), 2);

        let a = TaskId::from("a");
        store.toggle_task_completion(&a).await.unwrap();
        assert_eq!(store.task(&a).unwrap().completed(), true);
        store.toggle_task_completion(&a).await.unwrap();
        assert_eq!(store.task(&a).unwrap().completed(), false);
        assert!(store.toggle_task_completion(&TaskId::from("nope")).await.is_err());
    }

    #[tokio::test]
    async fn failed_writes_keep_memory() {
        let _ = env_logger::builder().is_test(true).try_init();

        let behaviour = Arc::new(Mutex::new(MockBehaviour {
            set_item_behaviour: (1, 1),
            ..MockBehaviour::default()
        }));
        let storage = MemoryStorage::with_mock_behaviour(behaviour);
        let (sender, receiver) = feedback::feedback_channel();
        let mut store = TaskStore::load_with_feedback(storage.clone(), sender).await;
        assert_eq!(*receiver.borrow(), StoreEvent::Loaded{ n_tasks: 0 });

        store.add_task(sample_task("a", "Saved")).await.unwrap();
        assert_eq!(*receiver.borrow(), StoreEvent::Saved{ n_tasks: 1 });

        let err = store.add_task(sample_task("b", "Not saved")).await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(err.is_rejection(), false);
        assert!(receiver.borrow().is_failure());
        assert_eq!(store.n_persistence_failures(), 1);

        // Memory is still the source of truth
        assert_eq!(store.len(), 2);
        let persisted: Vec<Task> = serde_json::from_str(&storage.raw_item("tasks").unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);

        // The next successful write catches up
        store.toggle_task_completion(&TaskId::from("a")).await.unwrap();
        let persisted: Vec<Task> = serde_json::from_str(&storage.raw_item("tasks").unwrap()).unwrap();
        assert_eq!(persisted, store.tasks());
    }

    #[tokio::test]
    async fn malformed_payload_loads_empty() {
        let _ = env_logger::builder().is_test(true).try_init();

        let storage = MemoryStorage::new();
        storage.set_raw_item("tasks", "{ this is not json");

        let (sender, receiver) = feedback::feedback_channel();
        let mut store = TaskStore::load_with_feedback(storage.clone(), sender).await;
        assert!(store.is_empty());
        assert!(matches!(&*receiver.borrow(), StoreEvent::LoadFailed{..}));
        assert_eq!(store.n_persistence_failures(), 1);

        store.clear_all_tasks().await.unwrap();
        assert_eq!(storage.raw_item("tasks"), None);
        assert_eq!(*receiver.borrow(), StoreEvent::Cleared);
    }

    #[tokio::test]
    async fn unreadable_storage_loads_empty() {
        let _ = env_logger::builder().is_test(true).try_init();

        let behaviour = Arc::new(Mutex::new(MockBehaviour {
            get_item_behaviour: (0, 1),
            ..MockBehaviour::default()
        }));
        let storage = MemoryStorage::with_mock_behaviour(behaviour);
        let payload = serde_json::to_string(&vec![sample_task("a", "Stored")]).unwrap();
        storage.set_raw_item("tasks", &payload);

        let (sender, receiver) = feedback::feedback_channel();
        let store = TaskStore::load_with_feedback(storage.clone(), sender).await;
        assert!(store.is_empty());
        assert!(matches!(&*receiver.borrow(), StoreEvent::LoadFailed{..}));
        assert_eq!(store.n_persistence_failures(), 1);

        // Loading does not touch the stored data
        assert_eq!(storage.raw_item("tasks"), Some(payload));
    }

    #[tokio::test]
    async fn failed_clear_still_empties_memory() {
        let _ = env_logger::builder().is_test(true).try_init();

        let behaviour = Arc::new(Mutex::new(MockBehaviour {
            remove_item_behaviour: (0, 1),
            ..MockBehaviour::default()
        }));
        let storage = MemoryStorage::with_mock_behaviour(behaviour);
        let (sender, receiver) = feedback::feedback_channel();
        let mut store = TaskStore::load_with_feedback(storage.clone(), sender).await;
        store.add_task(sample_task("a", "First")).await.unwrap();
        store.add_task(sample_task("b", "Second")).await.unwrap();

        let err = store.clear_all_tasks().await.unwrap_err();
        assert!(matches!(err, StoreError::Persistence(_)));
        assert_eq!(err.is_rejection(), false);
        assert!(matches!(&*receiver.borrow(), StoreEvent::SaveFailed{..}));
        assert_eq!(store.n_persistence_failures(), 1);

        assert!(store.is_empty());
        assert!(storage.raw_item("tasks").is_some());
    }

    #[tokio::test]
    async fn custom_key() {
        let storage = MemoryStorage::new();
        let config = StoreConfig { tasks_key: "other".to_string() };
        let mut store = TaskStore::load_with_config(storage.clone(), config, None).await;
        store.add_task(sample_task("a", "Task")).await.unwrap();

        assert!(storage.raw_item("other").is_some());
        assert!(storage.raw_item("tasks").is_none());
    }
}
