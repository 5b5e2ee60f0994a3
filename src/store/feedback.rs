//! Utilities to follow what happens to the persisted task list

use std::fmt::{Display, Error, Formatter};

/// An event about the persistence of a [`TaskStore`](super::TaskStore)
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    /// Nothing has been loaded yet
    NotLoaded,
    /// The task list has been loaded from the storage
    Loaded{ n_tasks: usize },
    /// The stored task list could not be read, the store started empty
    LoadFailed{ details: String },
    /// The whole task list has been written
    Saved{ n_tasks: usize },
    /// The stored task list has been removed
    Cleared,
    /// The last change only lives in memory
    SaveFailed{ details: String },
}

impl StoreEvent {
    /// Whether this event reports a problem a user may want to know about
    pub fn is_failure(&self) -> bool {
        match self {
            StoreEvent::LoadFailed{..} | StoreEvent::SaveFailed{..} => true,
            _ => false,
        }
    }
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            StoreEvent::NotLoaded => write!(f, "Not loaded"),
            StoreEvent::Loaded{n_tasks} => write!(f, "Loaded {} tasks", n_tasks),
            StoreEvent::LoadFailed{details} => write!(f, "Unable to load saved tasks: {}", details),
            StoreEvent::Saved{n_tasks} => write!(f, "Saved {} tasks", n_tasks),
            StoreEvent::Cleared => write!(f, "Saved tasks cleared"),
            StoreEvent::SaveFailed{details} => write!(f, "Unable to save tasks: {}", details),
        }
    }
}

impl Default for StoreEvent {
    fn default() -> Self {
        Self::NotLoaded
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<StoreEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<StoreEvent>;

/// Create a feeback channel, that can be used to retrieve the latest persistence event of a store
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(StoreEvent::default())
}



/// Logs persistence events, and forwards them to the listener (if any)
#[derive(Debug, Default)]
pub(crate) struct Feedback {
    n_failures: u32,
    channel: Option<FeedbackSender>,
}

impl Feedback {
    pub fn new(channel: Option<FeedbackSender>) -> Self {
        Self { n_failures: 0, channel }
    }

    /// How many load or save operations have failed since this store was created
    pub fn n_failures(&self) -> u32 {
        self.n_failures
    }

    pub fn send(&mut self, event: StoreEvent) {
        match &event {
            StoreEvent::LoadFailed{..} => {
                log::error!("{}", event);
                self.n_failures += 1;
            },
            StoreEvent::SaveFailed{..} => {
                log::warn!("{}", event);
                self.n_failures += 1;
            },
            StoreEvent::Loaded{..} => log::info!("{}", event),
            _ => log::debug!("{}", event),
        }

        if let Some(sender) = &self.channel {
            // Nobody listening anymore is fine
            let _ = sender.send(event);
        }
    }
}
