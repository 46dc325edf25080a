use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{Content, Role};

/// Metadata describing a prompt template exposed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// The name of the prompt, used as its identifier in `prompts/get`.
    pub name: String,
    /// A description of what this prompt provides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arguments used for templating the prompt, in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

impl Prompt {
    pub fn new<N, D>(name: N, description: Option<D>, arguments: Option<Vec<PromptArgument>>) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Prompt {
            name: name.into(),
            description: description.map(Into::into),
            arguments,
        }
    }
}

/// An argument that a prompt template accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// A single rendered message of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Content,
}

impl PromptMessage {
    pub fn new_text<S: Into<String>>(role: Role, text: S) -> Self {
        PromptMessage {
            role,
            content: Content::text(text),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PromptError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Prompt not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}
