use async_trait::async_trait;
use folio_protocol::prompt::{PromptArgument, PromptError, PromptMessage};
use serde_json::Value;
use std::collections::HashMap;

/// A prompt template. Usually generated from a plain function by the [`prompt`] macro.
///
/// [`prompt`]: crate::prompt
#[async_trait(?Send)]
pub trait PromptHandler: 'static {
    /// The name of the prompt
    fn name(&self) -> &'static str;

    /// A description of what the prompt does
    fn description(&self) -> Option<&'static str>;

    /// The arguments that the prompt accepts, in declaration order
    fn arguments(&self) -> Option<Vec<PromptArgument>>;

    /// Render the prompt with the given arguments.
    ///
    /// `params` may be missing arguments, including required ones, and may contain arguments the
    /// prompt doesn't use.
    async fn call(&self, params: HashMap<String, Value>) -> Result<Vec<PromptMessage>, PromptError>;
}

/// Read an argument as text. Strings are taken as-is, `null` counts as absent, and any other JSON
/// value is rendered as JSON.
pub fn argument_text(params: &HashMap<String, Value>, name: &str) -> Option<String> {
    match params.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
