//! Prop payloads: plain values and zero-argument producers.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type SyncProducer = dyn Fn() -> anyhow::Result<Value> + Send + Sync;
type AsyncProducer = dyn Fn() -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync;

/// A value, or a producer that computes one when the page is resolved.
///
/// Producers are `Fn`, not `FnOnce`: resolving the same props twice calls them twice.
///
/// # Examples
///
/// ```
/// use inertia_axum::props::Invokable;
///
/// let plain = Invokable::from("Test");
/// let computed = Invokable::from_fn(|| vec![1, 2, 3]);
/// let fetched = Invokable::from_async(|| async { "loaded" });
/// ```
#[derive(Clone)]
pub enum Invokable {
    /// Already-computed value
    Value(Value),
    /// Synchronous producer
    Sync(Arc<SyncProducer>),
    /// Asynchronous producer
    Async(Arc<AsyncProducer>),
}

impl Invokable {
    /// Wrap an infallible synchronous producer.
    pub fn from_fn<F, T>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Serialize,
    {
        Invokable::Sync(Arc::new(move || -> anyhow::Result<Value> {
            Ok(serde_json::to_value(f())?)
        }))
    }

    /// Wrap a fallible synchronous producer.
    pub fn try_from_fn<F, T>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
        T: Serialize,
    {
        Invokable::Sync(Arc::new(move || -> anyhow::Result<Value> {
            Ok(serde_json::to_value(f()?)?)
        }))
    }

    /// Wrap an infallible asynchronous producer.
    pub fn from_async<F, Fut, T>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize,
    {
        Invokable::Async(Arc::new(move || {
            let fut = f();
            async move { Ok::<Value, anyhow::Error>(serde_json::to_value(fut.await)?) }.boxed()
        }))
    }

    /// Wrap a fallible asynchronous producer.
    pub fn try_from_async<F, Fut, T>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Serialize,
    {
        Invokable::Async(Arc::new(move || {
            let fut = f();
            async move { Ok::<Value, anyhow::Error>(serde_json::to_value(fut.await?)?) }.boxed()
        }))
    }

    /// Serialize any value up front.
    pub fn serialize<T: Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Invokable::Value(serde_json::to_value(value)?))
    }

    /// Compute the payload.
    pub async fn invoke(&self) -> anyhow::Result<Value> {
        match self {
            Invokable::Value(v) => Ok(v.clone()),
            Invokable::Sync(f) => f(),
            Invokable::Async(f) => f().await,
        }
    }
}

impl fmt::Debug for Invokable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invokable::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Invokable::Sync(_) => f.write_str("Sync(..)"),
            Invokable::Async(_) => f.write_str("Async(..)"),
        }
    }
}

impl From<Value> for Invokable {
    fn from(v: Value) -> Self {
        Invokable::Value(v)
    }
}

impl From<&str> for Invokable {
    fn from(v: &str) -> Self {
        Invokable::Value(Value::from(v))
    }
}

impl From<String> for Invokable {
    fn from(v: String) -> Self {
        Invokable::Value(Value::from(v))
    }
}

impl From<bool> for Invokable {
    fn from(v: bool) -> Self {
        Invokable::Value(Value::from(v))
    }
}

impl From<i64> for Invokable {
    fn from(v: i64) -> Self {
        Invokable::Value(Value::from(v))
    }
}

impl From<f64> for Invokable {
    fn from(v: f64) -> Self {
        Invokable::Value(Value::from(v))
    }
}
