//! Multicast event list.
//!
//! Handlers are invoked in registration order. Dispatch snapshots the
//! handler list under the lock and releases it before calling anything, so
//! handlers may add or remove handlers (including themselves) while running.
//! Changes made during a dispatch take effect from the next one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::callback::{Callback, Closure, Delivery, Method};

/// Identifies a registered handler for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

struct Handler<A: ?Sized> {
    id: HandlerId,
    callback: Arc<dyn Callback<A>>,
}

impl<A: ?Sized> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// A thread-safe list of callbacks that all receive each event.
pub struct EventList<A: ?Sized + 'static> {
    next_id: AtomicU64,
    handlers: Mutex<Vec<Handler<A>>>,
}

impl<A: ?Sized + 'static> EventList<A> {
    /// Create an empty event list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a closure.
    pub fn add<F>(&self, f: F) -> HandlerId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.add_callback(Arc::new(Closure::new(f)))
    }

    /// Register `method` on a weakly-held `target`.
    ///
    /// The handler is dropped automatically once `target` is gone.
    pub fn add_method<T>(&self, target: &Arc<T>, method: fn(&T, &A)) -> HandlerId
    where
        T: Send + Sync + 'static,
    {
        self.add_callback(Arc::new(Method::new(target, method)))
    }

    /// Register any [`Callback`].
    pub fn add_callback(&self, callback: Arc<dyn Callback<A>>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push(Handler { id, callback });
        id
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn remove(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|handler| handler.id != id);
        handlers.len() != before
    }

    /// Remove all handlers.
    pub fn clear(&self) {
        self.handlers.lock().clear();
    }

    /// Number of handlers that can still be delivered to.
    pub fn len(&self) -> usize {
        self.handlers
            .lock()
            .iter()
            .filter(|handler| !handler.callback.is_expired())
            .count()
    }

    /// Whether no live handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `args` to every handler. Returns how many received it.
    ///
    /// Handlers found expired during dispatch are removed afterwards.
    pub fn invoke(&self, args: &A) -> usize {
        // Snapshot the handlers under the lock, then release before calling out.
        let snapshot: Vec<Handler<A>> = self.handlers.lock().clone();

        let mut delivered = 0;
        let mut expired = Vec::new();
        for handler in &snapshot {
            match handler.callback.invoke(args) {
                Delivery::Delivered => delivered += 1,
                Delivery::Expired => expired.push(handler.id),
            }
        }

        if !expired.is_empty() {
            self.handlers
                .lock()
                .retain(|handler| !expired.contains(&handler.id));
            tracing::debug!(expired = expired.len(), "pruned expired event handlers");
        }

        tracing::trace!(
            delivered,
            handlers = snapshot.len(),
            "event dispatched"
        );
        delivered
    }
}

impl<A: ?Sized + 'static> Default for EventList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized + 'static> fmt::Debug for EventList<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.handlers.lock().len();
        f.debug_struct("EventList")
            .field("handler_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_ordered() {
        let list: EventList<()> = EventList::new();
        let a = list.add(|_| {});
        let b = list.add(|_| {});
        assert!(a < b);
        assert_eq!(a.to_string(), "handler#0");
    }

    #[test]
    fn remove_reports_presence() {
        let list: EventList<()> = EventList::new();
        let id = list.add(|_| {});
        assert!(list.remove(id));
        assert!(!list.remove(id));
        assert!(list.is_empty());
    }

    #[test]
    fn debug_shows_count() {
        let list: EventList<str> = EventList::new();
        list.add(|_| {});
        assert_eq!(format!("{list:?}"), "EventList { handler_count: 1 }");
    }
}
