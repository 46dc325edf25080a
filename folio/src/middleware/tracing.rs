use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use folio_protocol::jsonrpc::{ResponseItem, SendableMessage};
use tower::{Layer, Service};
use tracing::{Instrument, Level};

const DEFAULT_TRACE_LEVEL: Level = Level::DEBUG;

/// A service that records a span for each incoming MCP message
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<SendableMessage> for TracingService<S>
where
    S: Service<SendableMessage, Response = Option<ResponseItem>, Error = Infallible>,
    S::Future: 'static,
{
    type Response = Option<ResponseItem>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: SendableMessage) -> Self::Future {
        let params = match &req {
            SendableMessage::Request(req) => req.params.as_ref(),
            SendableMessage::Notification(note) => note.params.as_ref(),
            SendableMessage::Invalid { .. } => None,
        };
        let span = tracing::span!(
            DEFAULT_TRACE_LEVEL,
            "request",
            method = req.method().unwrap_or("<invalid>"),
            params = ?params
        );

        let future = {
            let _guard = span.enter();
            self.inner.call(req)
        };

        Box::pin(
            async move {
                let response = future.await;
                if let Ok(Some(ResponseItem::Error { error, .. })) = &response {
                    tracing::debug!(code = ?error.code, message = %error.message, "Request returned an error");
                }
                response
            }
            .instrument(span),
        )
    }
}

/// A layer that wraps services with tracing functionality
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    /// Create a new tracing layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer
where
    S: Service<SendableMessage, Response = Option<ResponseItem>, Error = Infallible>,
    S::Future: 'static,
{
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}
