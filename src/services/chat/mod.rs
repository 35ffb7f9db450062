mod service;
mod types;
mod validation;


#[cfg(test)]
pub use service::MockChatCompletionService;
pub use service::{ChatCompletionService, ChatCompletionServiceImpl};
pub use types::{
    ChatCompletionChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    ChatMessageRole, ContentPart, FinishReason, ImageDetail, ImageUrl, MessageContent,
};
pub use validation::ChatRequestValidator;
