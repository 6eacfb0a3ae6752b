//! Change notification for ledger mutations.
//!
//! Observers are called synchronously, once per committed mutation, in
//! subscription order. There is no buffering and no replay: an observer only
//! sees mutations committed after it subscribed.

use std::{error::Error, fmt, sync::Arc};

use crate::Transaction;

pub type ObserverError = Box<dyn Error + Send + Sync>;
pub type ObserverResult = Result<(), ObserverError>;

/// Receives ledger mutations. Both callbacks default to doing nothing.
///
/// Callbacks run on the task that performed the mutation; a UI that needs
/// them on its own thread has to forward them itself.
pub trait LedgerObserver: Send + Sync {
    fn on_added(&self, _transaction: &Transaction) -> ObserverResult {
        Ok(())
    }

    fn on_removed(&self, _transaction: &Transaction) -> ObserverResult {
        Ok(())
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An observer callback that returned an error.
#[derive(Debug)]
pub struct ObserverFailure {
    pub subscription: SubscriptionId,
    pub error: ObserverError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    Added,
    Removed,
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Removed => f.write_str("removed"),
        }
    }
}

#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    observers: Vec<(SubscriptionId, Arc<dyn LedgerObserver>)>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn LedgerObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Copy of the current subscriptions, in subscription order.
    pub fn snapshot(&self) -> Vec<(SubscriptionId, Arc<dyn LedgerObserver>)> {
        self.observers.clone()
    }

    pub fn notify(&self, event: ChangeEvent, transaction: &Transaction) -> Vec<ObserverFailure> {
        deliver(&self.snapshot(), event, transaction)
    }
}

/// Calls every observer once, in order. A failing observer does not stop
/// delivery to the ones after it.
pub fn deliver(
    observers: &[(SubscriptionId, Arc<dyn LedgerObserver>)],
    event: ChangeEvent,
    transaction: &Transaction,
) -> Vec<ObserverFailure> {
    observers
        .iter()
        .filter_map(|(subscription, observer)| {
            let result = match event {
                ChangeEvent::Added => observer.on_added(transaction),
                ChangeEvent::Removed => observer.on_removed(transaction),
            };
            result.err().map(|error| ObserverFailure {
                subscription: *subscription,
                error,
            })
        })
        .collect()
}
