//! Listener registry for processed fixes

use crate::tracking::error::{TrackingError, TrackingResult};
use crate::tracking::FixEvent;
use std::collections::BTreeMap;
use std::fmt;

/// Callback invoked synchronously for every processed fix
pub type FixListener = Box<dyn Fn(&FixEvent) + Send>;

/// Registration handle returned by [`ListenerRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerHandle(u32);

impl ListenerHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Listeners keyed by handle. Handles increase monotonically, so iteration
/// order is registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u32,
    listeners: BTreeMap<ListenerHandle, FixListener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: FixListener) -> ListenerHandle {
        self.next_id += 1;
        let handle = ListenerHandle(self.next_id);
        self.listeners.insert(handle, listener);
        handle
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> TrackingResult<()> {
        match self.listeners.remove(&handle) {
            Some(_) => Ok(()),
            None => Err(TrackingError::UnknownListener { handle: handle.id() }),
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&self, event: &FixEvent) {
        for listener in self.listeners.values() {
            listener(event);
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
