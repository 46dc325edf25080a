//! Shaping handler output and registry content into protocol envelopes.
//!
//! Everything here is a pure transformation. Failures have already been dealt with by the time
//! these functions are called.

use folio_protocol::{
    content::Role,
    messages::{GetPromptResult, ListPromptsResult, ListResourcesResult, ReadResourceResult},
    prompt::{Prompt, PromptError, PromptMessage},
    resource::ResourceContents,
};

use crate::registry::ResourceDescriptor;

/// Trait for generating prompt messages.
///
/// The protocol requires `prompts/get` to return a list of messages. Prompt handlers may return
/// anything implementing this trait: a plain `String` becomes a single user message.
pub trait IntoPromptMessages {
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError>;
}

impl IntoPromptMessages for String {
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError> {
        Ok(vec![PromptMessage::new_text(Role::User, self)])
    }
}

impl IntoPromptMessages for &'static str {
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError> {
        self.to_string().into_prompt_messages()
    }
}

impl IntoPromptMessages for PromptMessage {
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError> {
        Ok(vec![self])
    }
}

impl IntoPromptMessages for Vec<PromptMessage> {
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError> {
        Ok(self)
    }
}

impl<T> IntoPromptMessages for Result<T, PromptError>
where
    T: IntoPromptMessages,
{
    fn into_prompt_messages(self) -> Result<Vec<PromptMessage>, PromptError> {
        self?.into_prompt_messages()
    }
}

/// Envelope for `resources/read`. `uri` is echoed exactly as the caller sent it.
pub fn wrap_resource(uri: &str, text: String, mime_type: &str) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(mime_type.to_string()),
            text,
        }],
    }
}

/// Envelope for `resources/list`, preserving descriptor order.
pub fn wrap_resource_list(descriptors: &[ResourceDescriptor]) -> ListResourcesResult {
    ListResourcesResult {
        resources: descriptors.iter().map(ResourceDescriptor::to_resource).collect(),
    }
}

/// Envelope for `prompts/list`, preserving prompt order.
pub fn wrap_prompt_list(prompts: Vec<Prompt>) -> ListPromptsResult {
    ListPromptsResult { prompts }
}

/// Envelope for `prompts/get`.
pub fn wrap_prompt_response(
    description: Option<&str>,
    messages: Vec<PromptMessage>,
) -> GetPromptResult {
    GetPromptResult {
        description: description.map(str::to_string),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::StaticContent;

    #[test]
    fn test_wrap_resource_echoes_caller_uri() {
        let result = wrap_resource("ui-system/Dialog-Patterns", "# D".to_string(), "text/markdown");
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"contents": [{
                "uri": "ui-system/Dialog-Patterns",
                "mimeType": "text/markdown",
                "text": "# D"
            }]})
        );
    }

    #[test]
    fn test_wrap_resource_list() {
        let descriptors = vec![ResourceDescriptor::new(
            "crm-base://ui-system/dialog-patterns",
            "Dialog patterns",
            "Modal conventions",
            StaticContent::new(""),
        )];
        let value = serde_json::to_value(wrap_resource_list(&descriptors)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"resources": [{
                "uri": "crm-base://ui-system/dialog-patterns",
                "name": "Dialog patterns",
                "description": "Modal conventions",
                "mimeType": "text/markdown"
            }]})
        );
    }

    #[test]
    fn test_prompt_response() {
        let messages = "Summarise".into_prompt_messages().unwrap();
        let result = wrap_prompt_response(Some("Summaries"), messages);
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "description": "Summaries",
                "messages": [{"role": "user", "content": {"type": "text", "text": "Summarise"}}]
            })
        );
    }

    #[test]
    fn test_result_passthrough() {
        let ok: Result<Vec<PromptMessage>, PromptError> = Ok(vec![
            PromptMessage::new_text(Role::User, "a"),
            PromptMessage::new_text(Role::Assistant, "b"),
        ]);
        assert_eq!(ok.into_prompt_messages().unwrap().len(), 2);

        let err: Result<String, PromptError> = Err(PromptError::InternalError("x".into()));
        assert!(err.into_prompt_messages().is_err());
    }
}
