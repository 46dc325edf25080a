use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::content::Annotations;

/// The MIME type used when a resource doesn't declare one.
pub const DEFAULT_MIME_TYPE: &str = "text/markdown";

/// A known resource that the server is capable of reading. This struct provides metadata about
/// resources in list calls. Contents are provided by `ResourceContents`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// The URI of this resource, eg `crm-base://ui-system/dialog-patterns`.
    pub uri: String,
    /// A human-readable name for this resource. This can be used by clients to populate UI elements.
    pub name: String,
    /// Optional description of what this resource represents. It can be thought of like a "hint"
    /// to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The MIME type of this resource, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Optional annotations for the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    /// The size of the raw resource content in bytes, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

/// The contents of a resource, identified by the `uri` field in `Resource`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResourceContents {
    /// Text resources contain UTF-8 encoded text data, such as markdown documents or templates.
    #[serde(rename_all = "camelCase")]
    TextResourceContents {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        text: String,
    },
}

impl Resource {
    /// Creates a new Resource from a URI.
    ///
    /// The URI must parse as an absolute URI. The name will be extracted from the last path
    /// segment of the URI if not provided.
    pub fn new<S: Into<String>>(
        uri: S,
        mime_type: Option<String>,
        name: Option<String>,
        annotations: Option<Annotations>,
    ) -> Result<Self, ResourceError> {
        let uri = uri.into();
        // Constructing the URL validates the URI scheme.
        let url =
            Url::parse(&uri).map_err(|e| ResourceError::InvalidUri(uri.clone(), e.to_string()))?;

        let name = match name {
            Some(n) => n,
            None => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| {
                    ResourceError::InvalidUri(
                        uri.clone(),
                        "Could not extract name from URI path".to_string(),
                    )
                })?
                .to_string(),
        };

        Ok(Self {
            uri,
            name,
            description: None,
            mime_type,
            annotations,
            size: None,
        })
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Failures reading a resource, as seen by the caller.
///
/// Both variants carry the URI exactly as the caller supplied it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to load resource {0}")]
    LoadFailed(String),
    #[error("Invalid URI: {0}. Error: {1}")]
    InvalidUri(String, String),
}
