mod categories;
mod error;
mod mapping;

pub use categories::{
    AuthenticationError, ConfigurationError, DataError, NetworkError, RateLimitError, ServerError,
    ValidationError,
};
pub use error::{FinetuneError, FinetuneResult};
pub use mapping::{ApiErrorDetail, ApiErrorResponse, ErrorMapper};
