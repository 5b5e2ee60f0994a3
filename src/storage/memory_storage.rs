use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Storage, StorageError};
use crate::mock_behaviour::MockBehaviour;

/// A storage that only lives in memory.
///
/// Clones share the same content, so that a clone given to a new [`TaskStore`](crate::store::TaskStore) behaves like the same device storage after a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,

    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage whose operations may fail, as described by `mock_behaviour`
    pub fn with_mock_behaviour(mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
            mock_behaviour: Some(mock_behaviour),
        }
    }

    /// Returns the raw value stored under `key`, bypassing any mock behaviour
    pub fn raw_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    /// Stores a raw value, bypassing any mock behaviour (e.g. to plant corrupt data in tests)
    pub fn set_raw_item(&self, key: &str, value: &str) {
        self.items.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    fn check(&self, f: fn(&mut MockBehaviour) -> Result<(), StorageError>) -> Result<(), StorageError> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => f(&mut behaviour.lock().unwrap()),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(MockBehaviour::can_get_item)?;
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(MockBehaviour::can_set_item)?;
        self.items.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check(MockBehaviour::can_remove_item)?;
        self.items.lock().unwrap().remove(key);
        Ok(())
    }
}
