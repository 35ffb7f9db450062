//! Management plane deployment fixtures

use serde_json::json;

pub fn deployment_response(state: &str) -> serde_json::Value {
    json!({
        "id": "/subscriptions/sub-1/resourceGroups/rg-ml/providers/Microsoft.CognitiveServices/accounts/acct/deployments/vqa-ft",
        "type": "Microsoft.CognitiveServices/accounts/deployments",
        "name": "vqa-ft",
        "sku": {"name": "standard", "capacity": 1},
        "properties": {
            "model": {
                "format": "OpenAI",
                "name": "gpt-4o-2024-08-06.ft-abc123",
                "version": "1"
            },
            "provisioningState": state
        }
    })
}
