// JSON-RPC 2.0 framing, as used by MCP.
//
// Deviations:
// * Requests and responses are assumed to be client-generated, not bi-directional.
use serde::{de, Deserialize, Serialize};
use serde_json::Value;

/// A single JSON-RPC message.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SendableMessage {
    Request(MethodCall),
    Notification(Notification),
    Invalid {
        /// call ID (if known)
        #[serde(default = "RequestId::null")]
        id: RequestId,
    },
}

impl From<MethodCall> for SendableMessage {
    fn from(request: MethodCall) -> Self {
        SendableMessage::Request(request)
    }
}

impl From<Notification> for SendableMessage {
    fn from(notification: Notification) -> Self {
        SendableMessage::Notification(notification)
    }
}

impl SendableMessage {
    /// The method named by this message, if it is well-formed.
    pub fn method(&self) -> Option<&str> {
        match self {
            SendableMessage::Request(req) => Some(&req.method),
            SendableMessage::Notification(note) => Some(&note.method),
            SendableMessage::Invalid { .. } => None,
        }
    }
}

impl<'de> Deserialize<'de> for SendableMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if let Ok(req) = MethodCall::deserialize(&value) {
            return Ok(SendableMessage::Request(req));
        }
        if let Ok(note) = Notification::deserialize(&value) {
            return Ok(SendableMessage::Notification(note));
        }

        // Invalid message. Keep the ID, if there is a usable one, so the error can echo it.
        let id = match &value {
            Value::Object(map) => map
                .get("id")
                .and_then(|id_val| RequestId::deserialize(id_val).ok())
                .unwrap_or_else(RequestId::null),
            _ => RequestId::Null,
        };
        Ok(SendableMessage::Invalid { id })
    }
}

/// What arrives on one line of the transport: a single message, or a batch of them.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum Request {
    Single(SendableMessage),
    Batch(Vec<SendableMessage>),
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, SeqAccess, Visitor};
        use std::fmt;

        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = Request;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON-RPC message or batch of messages")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Request, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut messages = Vec::new();
                while let Some(msg) = seq.next_element::<SendableMessage>()? {
                    messages.push(msg);
                }
                Ok(Request::Batch(messages))
            }

            fn visit_map<M>(self, map: M) -> Result<Request, M::Error>
            where
                M: MapAccess<'de>,
            {
                let value = Value::deserialize(de::value::MapAccessDeserializer::new(map))?;
                let msg = SendableMessage::deserialize(value).map_err(de::Error::custom)?;
                Ok(Request::Single(msg))
            }
        }

        deserializer.deserialize_any(RequestVisitor)
    }
}

/// What is written back on one line of the transport.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Single(Option<ResponseItem>),
    Batch(Vec<ResponseItem>),
}

impl Response {
    /// Whether there is nothing to write back (eg the request was a notification).
    pub fn is_empty(&self) -> bool {
        match self {
            Response::Single(opt) => opt.is_none(),
            Response::Batch(responses) => responses.is_empty(),
        }
    }
}

/// Message ID, which according to the MCP spec must be either a number or a string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Num(u64),
    Str(String),
    /// No id (used for request errors and notifications)
    Null,
}

impl RequestId {
    #[inline]
    pub const fn null() -> Self {
        RequestId::Null
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, RequestId::Null)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JsonRpcVersion {
    V2,
}

impl TryFrom<String> for JsonRpcVersion {
    type Error = de::value::Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "2.0" => Ok(JsonRpcVersion::V2),
            _ => Err(de::Error::custom("not a valid JSON-RPC 2.0 message")),
        }
    }
}

impl From<JsonRpcVersion> for String {
    fn from(version: JsonRpcVersion) -> Self {
        match version {
            JsonRpcVersion::V2 => "2.0".to_string(),
        }
    }
}

/// Structured parameters which may be included in a request or notification.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Params {
    Array(Vec<Value>),
    Map(serde_json::Map<String, Value>),
}

impl TryFrom<Value> for Params {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(vec) => Ok(Params::Array(vec)),
            Value::Object(map) => Ok(Params::Map(map)),
            _ => Err(de::Error::custom(format!(
                "JSON-RPC params must be either an array or object, got {:?}",
                value
            ))),
        }
    }
}

/// An RPC method call (known in the JSON-RPC spec as a "request").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MethodCall {
    jsonrpc: JsonRpcVersion,
    /// If `id` is omitted, the message is a notification. MCP does not permit a null id here.
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl MethodCall {
    pub fn new(id: RequestId, method: String, params: Option<Params>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion::V2,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    jsonrpc: JsonRpcVersion,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Notification {
    pub fn new(method: String, params: Option<Params>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion::V2,
            method,
            params,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum ResponseItem {
    Success {
        jsonrpc: JsonRpcVersion,
        id: RequestId,
        result: Value,
    },
    Error {
        jsonrpc: JsonRpcVersion,
        id: RequestId,
        error: ErrorData,
    },
}

impl ResponseItem {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Success {
            jsonrpc: JsonRpcVersion::V2,
            id,
            result,
        }
    }

    pub fn error(id: RequestId, error: ErrorData) -> Self {
        Self::Error {
            jsonrpc: JsonRpcVersion::V2,
            id,
            error,
        }
    }

    pub fn id(&self) -> &RequestId {
        match self {
            Self::Success { id, .. } | Self::Error { id, .. } => id,
        }
    }
}

// Standard JSON-RPC error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid Request object.
    InvalidRequest,
    /// The method does not exist / is not available.
    MethodNotFound,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal JSON-RPC error.
    InternalError,
    /// Custom, implementation-defined server errors.
    Custom(i32),
}

impl ErrorCode {
    pub const fn code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::Custom(code) => *code,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        Ok(match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            other => Self::Custom(other),
        })
    }
}

/// Error information for JSON-RPC error responses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorData {
    pub code: ErrorCode,

    /// A short description of the error. The message SHOULD be limited to a concise single sentence.
    pub message: String,

    /// Additional information about the error, defined by the sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorData {
    /// Create a new error data instance, with no additional data.
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            data: None,
        }
    }
}
