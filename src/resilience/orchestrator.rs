use crate::errors::{FinetuneError, FinetuneResult};
use crate::resilience::{
    retry_with_policy, NoOpHooks, ResilienceHooks, RetryContext, RetryPolicy, TracingHooks,
};
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Wraps every remote call made by the services in the configured retry policy.
pub struct ResilienceOrchestrator {
    policy: RetryPolicy,
    hooks: Arc<dyn ResilienceHooks>,
}

impl ResilienceOrchestrator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            hooks: Arc::new(TracingHooks),
        }
    }

    /// One attempt, no hooks. Used by unit tests that script transport failures.
    pub fn passthrough() -> Self {
        Self {
            policy: RetryPolicy::none(),
            hooks: Arc::new(NoOpHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ResilienceHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute<T, F, Fut>(&self, operation: &str, call: F) -> FinetuneResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FinetuneResult<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let attempts = AtomicU32::new(1);
        let hooks = self.hooks.as_ref();

        let result = retry_with_policy(
            &self.policy,
            |attempt, error: &FinetuneError, delay| {
                attempts.store(attempt + 1, Ordering::Relaxed);
                hooks.on_retry(
                    &RetryContext {
                        operation,
                        attempt,
                        max_attempts,
                    },
                    error,
                    delay,
                );
            },
            call,
        )
        .await;

        let ctx = RetryContext {
            operation,
            attempt: attempts.load(Ordering::Relaxed),
            max_attempts,
        };
        match &result {
            Ok(_) => hooks.on_success(&ctx),
            Err(error) => hooks.on_exhausted(&ctx, error),
        }
        result
    }
}

impl Default for ResilienceOrchestrator {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
