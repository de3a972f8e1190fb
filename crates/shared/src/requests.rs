//! Request bodies accepted by the orchestration endpoint.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/generate-video`.
///
/// `prompt` is optional on the wire so that a missing field produces the
/// endpoint's own `missing_prompt` error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Body of `POST /api/compose-prompt`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposePromptRequest {
    /// Category key ("equipment", "movement", ...) to option id
    #[serde(default)]
    pub selections: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
    /// Curated example prompt used verbatim instead of the selections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,
    /// Director preset id; its selections are overridden by explicit ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_prompt_deserializes_to_none() {
        let req: GenerateVideoRequest = serde_json::from_str("{}").unwrap();
        assert!(req.prompt.is_none());
    }

    #[test]
    fn compose_request_reads_camel_case() {
        let req: ComposePromptRequest = serde_json::from_str(
            r#"{"selections":{"equipment":"iphone"},"sceneDescription":"A cat","preset":"lynch"}"#,
        )
        .unwrap();
        assert_eq!(req.selections.get("equipment").map(String::as_str), Some("iphone"));
        assert_eq!(req.scene_description.as_deref(), Some("A cat"));
        assert_eq!(req.preset.as_deref(), Some("lynch"));
        assert!(req.inspiration.is_none());
    }
}
