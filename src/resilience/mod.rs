mod hooks;
mod orchestrator;
mod retry;

pub use hooks::{NoOpHooks, ResilienceHooks, RetryContext, TracingHooks};
pub use orchestrator::ResilienceOrchestrator;
pub use retry::{retry_with_policy, DelayStrategy, RetryCondition, RetryPolicy, Retryable};
