//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The storage key the task list is persisted under
pub const TASKS_KEY: &str = "tasks";

/// Base URL of the remote task API (a mock backend, see [`crate::client`]).
/// Feel free to override it when initing this library.
pub static API_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("https://68333c07464b499636fec58b.mockapi.io/api/v1".to_string())));

/// Folder used by [`FileStorage::default_folder`](crate::storage::FileStorage::default_folder).
/// Feel free to override it when initing this library.
pub static STORAGE_FOLDER: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("taskboard_data".to_string())));

/// Read the current value of one of the settings of this module
pub fn get(setting: &Lazy<Arc<Mutex<String>>>) -> String {
    match setting.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Override one of the settings of this module
pub fn set(setting: &Lazy<Arc<Mutex<String>>>, value: String) {
    match setting.lock() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}


/// Per-store settings, given at construction time
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// The key the task list is stored under
    pub tasks_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tasks_key: TASKS_KEY.to_string(),
        }
    }
}
