use thiserror::Error;

/// Errors raised by a transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    #[error("LinesCodecError error: {0}")]
    LinesCodecError(#[from] tokio_util::codec::LinesCodecError),
}

/// Reasons a line read from the transport could not become a request.
#[derive(Error, Debug)]
pub enum MessageParseError {
    #[error("JSON deserialisation error: {0}")]
    Deserialisation(serde_json::Error),

    #[error("LinesCodecError error: {0}")]
    LinesCodecError(#[from] tokio_util::codec::LinesCodecError),
}

mod stdio;
pub use stdio::StdioTransport;
