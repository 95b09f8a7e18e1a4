//! Named promise handlers.
//!
//! A promise handler is the only asynchronous capability. It returns a
//! Stillwater effect that the runtime engine runs; nothing in this crate
//! runs it.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use stillwater::effect::BoxedEffect;
use thiserror::Error;

/// Reason a promise settled in its `catch` branch.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Promise rejected: {reason}")]
pub struct PromiseRejection {
    pub reason: String,
}

impl PromiseRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Effect produced by a promise handler. Resolves to a JSON payload.
pub type PromiseEffect = BoxedEffect<Value, PromiseRejection, ()>;

/// Factory creating a fresh promise effect per invocation.
pub struct PromiseHandler<C, E> {
    start: Arc<dyn Fn(&C, &E) -> PromiseEffect + Send + Sync>,
}

impl<C, E> PromiseHandler<C, E> {
    pub fn new<F>(start: F) -> Self
    where
        F: Fn(&C, &E) -> PromiseEffect + Send + Sync + 'static,
    {
        PromiseHandler {
            start: Arc::new(start),
        }
    }

    pub fn invoke(&self, context: &C, event: &E) -> PromiseEffect {
        (self.start)(context, event)
    }
}

impl<C, E> Clone for PromiseHandler<C, E> {
    fn clone(&self) -> Self {
        Self {
            start: Arc::clone(&self.start),
        }
    }
}

impl<C, E> fmt::Debug for PromiseHandler<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stillwater::prelude::*;

    #[tokio::test]
    async fn handler_creates_fresh_effects() {
        let handler = PromiseHandler::new(|count: &u32, _: &()| {
            let doubled = count * 2;
            pure(json!(doubled)).boxed()
        });

        let first = handler.invoke(&2, &()).run(&()).await.unwrap();
        let second = handler.invoke(&5, &()).run(&()).await.unwrap();

        assert_eq!(first, json!(4));
        assert_eq!(second, json!(10));
    }

    #[tokio::test]
    async fn handler_can_reject() {
        let handler = PromiseHandler::new(|_: &(), _: &()| {
            fail(PromiseRejection::new("offline")).boxed()
        });

        let result = handler.invoke(&(), &()).run(&()).await;
        assert_eq!(result.unwrap_err(), PromiseRejection::new("offline"));
    }
}
