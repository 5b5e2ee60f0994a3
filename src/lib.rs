//! This crate provides the core of a personal to-do application.
//!
//! It provides a local task store in the [`store`] module: a [`TaskStore`] owns the list of tasks of a session, and keeps it in sync with a device-local [`Storage`](storage::Storage).
//!
//! Tasks can then be bucketed by calendar day, or laid out on a month grid, using the [`calendar`] module.
//!
//! A client for a remote task API is also provided in the [`client`] module. It can be used as a stand-alone module, it is not synchronised with the local store.

pub mod task;
pub use task::{Priority, Task, TaskId};
pub mod category;
pub use category::{Category, CategoryId};

pub mod storage;
pub mod store;
pub use store::{StoreError, TaskStore};
pub mod calendar;

pub mod client;

pub mod config;
pub mod mock_behaviour;
pub mod utils;
