//! Get-or-compute caching around tool invocations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use stepweave_core::{Parameters, ToolOutput};

use crate::key::canonical_key;
use crate::store::CacheStore;

/// Store type shared by every tool invocation in the process.
pub type ToolCache = CacheStore<ToolOutput>;

/// Output of a cached call and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedCall {
    pub output: ToolOutput,
    pub from_cache: bool,
}

/// Wraps tool execution with get-or-compute-and-store semantics.
///
/// Only successful outputs are stored, so a failing call is retried on the
/// next identical invocation.
#[derive(Debug, Clone)]
pub struct InvocationCache {
    store: Arc<ToolCache>,
}

impl InvocationCache {
    pub fn new(store: Arc<ToolCache>) -> Self {
        Self { store }
    }

    /// The underlying shared store.
    pub fn store(&self) -> &Arc<ToolCache> {
        &self.store
    }

    /// Return the cached output for this call, or run `compute` and cache
    /// its output if it succeeded.
    ///
    /// Errors from `compute` are passed through and never cached.
    pub async fn cached_call<F, Fut, E>(
        &self,
        tool_name: &str,
        parameters: &Parameters,
        ttl: Duration,
        compute: F,
    ) -> Result<CachedCall, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ToolOutput, E>>,
    {
        let key = canonical_key(tool_name, parameters);

        if let Some(output) = self.store.get(&key) {
            trace!(tool = tool_name, key = %key, "Cache hit");
            return Ok(CachedCall {
                output,
                from_cache: true,
            });
        }

        let output = compute().await?;
        if output.is_success() {
            self.store.set(key, output.clone(), ttl);
        }

        Ok(CachedCall {
            output,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(60);

    fn city(name: &str) -> Parameters {
        let mut params = Parameters::new();
        params.insert("city".into(), json!(name));
        params
    }

    #[tokio::test]
    async fn second_identical_call_is_served_from_cache() {
        let cache = InvocationCache::new(Arc::new(ToolCache::new()));
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let compute = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(ToolOutput::success(json!({"temp": 21})))
        };

        let first = cache
            .cached_call("get_weather", &city("Paris"), TTL, compute)
            .await
            .unwrap();
        let second = cache
            .cached_call("get_weather", &city("Paris"), TTL, compute)
            .await
            .unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.output, second.output);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_never_cached() {
        let store = Arc::new(ToolCache::new());
        let cache = InvocationCache::new(Arc::clone(&store));
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let compute = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(ToolOutput::failure("rate limited"))
        };

        for _ in 0..2 {
            let call = cache
                .cached_call("get_weather", &city("Paris"), TTL, compute)
                .await
                .unwrap();
            assert!(!call.from_cache);
            assert!(!call.output.is_success());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn errors_pass_through_uncached() {
        let store = Arc::new(ToolCache::new());
        let cache = InvocationCache::new(Arc::clone(&store));

        let result = cache
            .cached_call("get_weather", &city("Paris"), TTL, || async {
                Err::<ToolOutput, _>("socket closed")
            })
            .await;

        assert_eq!(result.unwrap_err(), "socket closed");
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_recomputed() {
        let cache = InvocationCache::new(Arc::new(ToolCache::new()));
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let compute = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(ToolOutput::success(json!(1)))
        };

        let ttl = Duration::from_secs(1);
        cache
            .cached_call("t", &Parameters::new(), ttl, compute)
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        let again = cache
            .cached_call("t", &Parameters::new(), ttl, compute)
            .await
            .unwrap();

        assert!(!again.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_parameters_do_not_collide() {
        let cache = InvocationCache::new(Arc::new(ToolCache::new()));
        let compute =
            |v: i32| move || async move { Ok::<_, Infallible>(ToolOutput::success(json!(v))) };

        cache
            .cached_call("get_weather", &city("Paris"), TTL, compute(1))
            .await
            .unwrap();
        let london = cache
            .cached_call("get_weather", &city("London"), TTL, compute(2))
            .await
            .unwrap();

        assert!(!london.from_cache);
        assert_eq!(london.output, ToolOutput::success(json!(2)));
    }
}
