//! Log subscriber setup for the `finetune` binary and library consumers.

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
