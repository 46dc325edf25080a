use std::path::PathBuf;

use folio_protocol::{
    jsonrpc::{ErrorCode, ErrorData},
    prompt::PromptError,
    resource::ResourceError,
};
use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised while *processing* a request.
/// These errors assume that the request is valid and was successfully parsed. Errors for invalid
/// requests are handled at the transport level, within [`MessageParseError`].
///
/// Every variant is recovered at the call boundary: it becomes an error reply for that one call.
///
/// [`MessageParseError`]: crate::transport::MessageParseError
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// Carries only the caller's URI. The underlying cause is logged, never sent to the client.
    #[error("failed to load resource {0}")]
    ResourceLoadFailed(String),
}

/// Request errors can be returned as a `ResponseItem` with the error type.
impl From<RequestError> for ErrorData {
    fn from(err: RequestError) -> Self {
        let code = match err {
            RequestError::MethodNotFound(_) => ErrorCode::MethodNotFound,
            RequestError::InvalidParams(_) => ErrorCode::InvalidParams,
            RequestError::Internal(_) => ErrorCode::InternalError,
            RequestError::ResourceNotFound(_) => ErrorCode::InvalidParams,
            RequestError::ResourceLoadFailed(_) => ErrorCode::InternalError,
        };

        ErrorData::new(code, err.to_string())
    }
}

impl From<ResourceError> for RequestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(uri) => RequestError::ResourceNotFound(uri),
            ResourceError::LoadFailed(uri) => RequestError::ResourceLoadFailed(uri),
            ResourceError::InvalidUri(..) => RequestError::InvalidParams(err.to_string()),
        }
    }
}

impl From<PromptError> for RequestError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::InvalidParameters(msg) => RequestError::InvalidParams(msg),
            PromptError::NotFound(_) => RequestError::InvalidParams(err.to_string()),
            PromptError::InternalError(msg) => RequestError::Internal(msg),
        }
    }
}

/// Raised while assembling a registry. Any of these aborts startup: the server must not serve an
/// ambiguous or malformed catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistrationError {
    #[error("Conflicting registrations for `{path}`: {existing} and {incoming}")]
    Conflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("Invalid resource identifier `{identifier}`: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
}

/// Raised when the discovery scan itself fails. Discovery logs these and carries on with no
/// discovered entries.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Discovery directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Discovery directory is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Invalid discovery category `{category}`: {reason}")]
    InvalidCategory { category: String, reason: String },

    #[error("Invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error during discovery: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that stop a server, either before it starts or while it runs.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_echoes_uri_verbatim() {
        let uri = "CRM-BASE://Ui-System/Dialog-Patterns";
        let data = ErrorData::from(RequestError::from(ResourceError::NotFound(uri.to_string())));
        assert_eq!(data.code, ErrorCode::InvalidParams);
        assert_eq!(data.message, format!("resource not found: {uri}"));
    }

    #[test]
    fn test_load_failure_is_sanitised() {
        let data = ErrorData::from(RequestError::from(ResourceError::LoadFailed(
            "crm-base://readme/broken".to_string(),
        )));
        assert_eq!(data.code, ErrorCode::InternalError);
        assert_eq!(data.message, "failed to load resource crm-base://readme/broken");
        assert!(data.data.is_none());
    }

    #[test]
    fn test_prompt_errors() {
        let data = ErrorData::from(RequestError::from(PromptError::NotFound("x".to_string())));
        assert_eq!(data.code, ErrorCode::InvalidParams);
        assert_eq!(data.message, "Invalid parameters: Prompt not found: x");

        let data = ErrorData::from(RequestError::from(PromptError::InternalError(
            "boom".to_string(),
        )));
        assert_eq!(data.code, ErrorCode::InternalError);
        assert_eq!(data.message, "Internal error: boom");

        let data = ErrorData::from(RequestError::from(PromptError::InvalidParameters(
            "Missing required argument: client".to_string(),
        )));
        assert_eq!(data.code, ErrorCode::InvalidParams);
        assert_eq!(data.message, "Invalid parameters: Missing required argument: client");
    }
}
