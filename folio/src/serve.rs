use crate::transport::{MessageParseError, TransportError};
use futures::{SinkExt, StreamExt};
use folio_protocol::jsonrpc::{ErrorCode, ErrorData, Request, RequestId, Response, ResponseItem};
use std::convert::Infallible;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tower::Service;

/// Longest line accepted from the client. Anything longer is discarded by the codec.
const MAX_LINE_LENGTH: usize = 2 * 1024 * 1024;

#[inline]
fn parse_message(line: Result<String, LinesCodecError>) -> Result<Request, MessageParseError> {
    let line = line?;
    serde_json::from_str::<Request>(&line).map_err(MessageParseError::Deserialisation)
}

/// Write a JSON-RPC response on the transport.
#[inline]
async fn write_message<T>(
    frame: &mut Framed<T, LinesCodec>,
    msg: Response,
) -> Result<(), TransportError>
where
    T: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(&msg)?;
    frame.send(json).await?;
    Ok(())
}

async fn handle_connection<S, T>(mut service: S, transport: T) -> Result<(), TransportError>
where
    S: Service<Request, Response = Response, Error = Infallible>,
    T: AsyncRead + AsyncWrite + Unpin,
{
    let mut frame = Framed::new(transport, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    // Process the stream in lines until the connection closes
    while let Some(line) = frame.next().await {
        match parse_message(line) {
            Ok(message) => {
                let response = match service.call(message).await {
                    Ok(response) => response,
                    Err(never) => match never {},
                };
                if !response.is_empty() {
                    if let Err(e) = write_message(&mut frame, response).await {
                        tracing::error!(error = ?e, "Error writing response over transport");
                    }
                }
            }
            Err(e) => match e {
                // JSON-RPC answers unparseable input with a null-id parse error
                MessageParseError::Deserialisation(_) => {
                    let error_data = ErrorData::new(
                        ErrorCode::ParseError,
                        "JSON parsing error when deserialising the message".to_string(),
                    );
                    let msg = ResponseItem::error(RequestId::Null, error_data);
                    write_message(&mut frame, Response::Single(Some(msg))).await?;
                    tracing::debug!(error = ?e, "Transport error (deserialisation)");
                }
                MessageParseError::LinesCodecError(_) => {
                    // Keep the connection open; the codec skips to the next line.
                    tracing::error!(error = ?e, "Transport error");
                }
            },
        }
    }

    Ok(())
}

/// Serve a request-level service over a transport, one JSON-RPC message (or batch) per line.
///
/// Returns once the client closes its side of the transport.
pub async fn serve<S, T>(service: S, transport: T) -> Result<(), TransportError>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + 'static,
    T: AsyncRead + AsyncWrite + Unpin,
{
    tracing::info!("Serving requests");
    let result = handle_connection(service, transport).await;
    tracing::info!("Transport closed");
    result
}
