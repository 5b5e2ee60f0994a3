//! This module provides ways to tweak mocked storages, so that they can return errors on some tests

use crate::storage::StorageError;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub get_item_behaviour: (u32, u32),
    pub set_item_behaviour: (u32, u32),
    pub remove_item_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_item_behaviour: (0, n_fails),
            set_item_behaviour: (0, n_fails),
            remove_item_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get_item(&mut self) -> Result<(), StorageError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_item_behaviour, "get_item")
    }
    pub fn can_set_item(&mut self) -> Result<(), StorageError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.set_item_behaviour, "set_item")
    }
    pub fn can_remove_item(&mut self) -> Result<(), StorageError> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.remove_item_behaviour, "remove_item")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), StorageError> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}
