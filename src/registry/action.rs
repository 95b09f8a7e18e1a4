//! Named action implementations.

use std::fmt;
use std::sync::Arc;

/// Pure action: computes the next context from the current one and the
/// triggering event.
pub struct Action<C, E> {
    apply: Arc<dyn Fn(&C, &E) -> C + Send + Sync>,
}

impl<C, E> Action<C, E> {
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(&C, &E) -> C + Send + Sync + 'static,
    {
        Action {
            apply: Arc::new(apply),
        }
    }

    pub fn apply(&self, context: &C, event: &E) -> C {
        (self.apply)(context, event)
    }
}

impl<C, E> Clone for Action<C, E> {
    fn clone(&self) -> Self {
        Self {
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<C, E> fmt::Debug for Action<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}
