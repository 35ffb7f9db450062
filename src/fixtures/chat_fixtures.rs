//! Chat completion fixtures

use serde_json::json;

/// Sample successful chat completion response
pub fn chat_completion_response() -> serde_json::Value {
    chat_completion_with_text("A tabby cat sitting on a windowsill.")
}

/// Completion whose single choice answers with `text`.
pub fn chat_completion_with_text(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": text
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 9,
            "completion_tokens": 12,
            "total_tokens": 21
        }
    })
}

/// Completion cut by the content filter, with no text.
pub fn chat_completion_filtered() -> serde_json::Value {
    json!({
        "id": "chatcmpl-126",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null
            },
            "finish_reason": "content_filter"
        }]
    })
}
