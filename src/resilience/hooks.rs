use crate::errors::FinetuneError;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryContext<'a> {
    pub operation: &'a str,
    pub attempt: u32,
    pub max_attempts: u32,
}

/// Observation points around a retried remote call.
pub trait ResilienceHooks: Send + Sync {
    fn on_retry(&self, _ctx: &RetryContext<'_>, _error: &FinetuneError, _delay: Duration) {}
    fn on_exhausted(&self, _ctx: &RetryContext<'_>, _error: &FinetuneError) {}
    fn on_success(&self, _ctx: &RetryContext<'_>) {}
}

pub struct NoOpHooks;

impl ResilienceHooks for NoOpHooks {}

/// Reports retries and give-ups through `tracing`.
pub struct TracingHooks;

impl ResilienceHooks for TracingHooks {
    fn on_retry(&self, ctx: &RetryContext<'_>, error: &FinetuneError, delay: Duration) {
        tracing::warn!(
            operation = ctx.operation,
            attempt = ctx.attempt,
            max_attempts = ctx.max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "remote call failed, retrying"
        );
    }

    fn on_exhausted(&self, ctx: &RetryContext<'_>, error: &FinetuneError) {
        tracing::error!(
            operation = ctx.operation,
            attempts = ctx.attempt,
            error = %error,
            "remote call failed"
        );
    }

    fn on_success(&self, ctx: &RetryContext<'_>) {
        if ctx.attempt > 1 {
            tracing::info!(
                operation = ctx.operation,
                attempts = ctx.attempt,
                "remote call succeeded after retry"
            );
        } else {
            tracing::debug!(operation = ctx.operation, "remote call succeeded");
        }
    }
}
