//! Ordered change-notification lists.
//!
//! Skills, stats, and awareness maps publish their changes to the callbacks
//! registered here. Callbacks run synchronously, in registration order, on
//! whichever thread mutates the owning value (the scheduler's consumer loop).

use std::fmt;

type Handler<E> = Box<dyn FnMut(&E) + Send>;

/// Registered listener callbacks for change records of type `E`.
pub struct Listeners<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers a callback. It runs after every callback registered before it.
    pub fn subscribe(&mut self, handler: impl FnMut(&E) + Send + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Invokes every callback with `event`.
    pub fn notify(&mut self, event: &E) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.handlers.len())
            .finish()
    }
}
