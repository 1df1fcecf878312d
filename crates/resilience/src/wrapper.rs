//! Reusable wrappers binding a handler to a function.

use crate::handler::ResilientErrorHandler;
use foundation_shared::{ErrorEnvelope, Result};
use std::borrow::Cow;
use std::future::Future;

/// Name reported for functions wrapped without one.
pub const ANONYMOUS: &str = "<anonymous>";

/// A function guarded by a [`ResilientErrorHandler`].
///
/// Multiple arguments are passed as a tuple.
#[derive(Debug, Clone)]
pub struct Resilient<F, T> {
    name: Cow<'static, str>,
    handler: ResilientErrorHandler<T>,
    function: F,
}

/// Guard `function` with `handler`, reporting failures under `name`.
pub fn resilient<F, T>(
    handler: ResilientErrorHandler<T>,
    name: impl Into<Cow<'static, str>>,
    function: F,
) -> Resilient<F, T> {
    Resilient {
        name: name.into(),
        handler,
        function,
    }
}

impl<F, T> Resilient<F, T> {
    /// Guard a function that has no meaningful name.
    pub fn anonymous(handler: ResilientErrorHandler<T>, function: F) -> Self {
        resilient(handler, ANONYMOUS, function)
    }

    /// Name used in log events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The guarding policy.
    pub const fn handler(&self) -> &ResilientErrorHandler<T> {
        &self.handler
    }
}

impl<F, T: Clone> Resilient<F, T> {
    /// Call a synchronous function.
    pub fn call<A, E>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> std::result::Result<T, E>,
        E: Into<ErrorEnvelope>,
    {
        self.handler.run(&self.name, || (self.function)(args))
    }

    /// Call an asynchronous function, awaiting it once.
    pub async fn call_async<A, Fut, E>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<ErrorEnvelope>,
    {
        self.handler
            .run_async(&self.name, || (self.function)(args))
            .await
    }
}
