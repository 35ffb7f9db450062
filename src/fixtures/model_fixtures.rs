//! Model fixtures

use serde_json::json;

/// Sample list models response
pub fn list_models_response() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            {
                "id": "gpt-4o-mini-2024-07-18",
                "object": "model",
                "created": 1721172717,
                "owned_by": "system"
            },
            {
                "id": "ft:gpt-4o-mini-2024-07-18:org:vqa:9abc",
                "object": "model",
                "created": 1727000000,
                "owned_by": "org-123"
            }
        ]
    })
}

/// Sample retrieve model response
pub fn retrieve_model_response() -> serde_json::Value {
    json!({
        "id": "ft:gpt-4o-mini-2024-07-18:org:vqa:9abc",
        "object": "model",
        "created": 1727000000,
        "owned_by": "org-123"
    })
}
