use std::{
    convert::Infallible,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use folio_protocol::jsonrpc::{
    ErrorCode, ErrorData, Request, RequestId, Response, ResponseItem, SendableMessage,
};
use tower::{Service, ServiceExt as _};

/// Extension trait that adds additional methods to any [`Service`] that processes MCP messages.
pub trait ServiceExt<R>: Service<R> + Sized {
    /// Convert this service into a [`RequestService`], which processes one line of input: a single
    /// message or a batch of them.
    fn into_request_service(self) -> RequestService<Self>;
}

impl<S> ServiceExt<SendableMessage> for S
where
    S: Service<SendableMessage, Response = Option<ResponseItem>, Error = Infallible>
        + Sized
        + Clone
        + 'static,
{
    fn into_request_service(self) -> RequestService<Self> {
        RequestService::new(self)
    }
}

/// Lifts a message-level service to whole requests.
///
/// Batches are handled one message at a time, in order. Messages that could not be understood are
/// answered with an "Invalid request" error here, since the inner service never sees a method for
/// them.
#[derive(Clone)]
pub struct RequestService<S> {
    inner: S,
}

impl<S> RequestService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

fn invalid_request(message: &str) -> ErrorData {
    ErrorData::new(ErrorCode::InvalidRequest, message.to_string())
}

async fn handle_message<S>(service: &mut S, message: SendableMessage) -> Option<ResponseItem>
where
    S: Service<SendableMessage, Response = Option<ResponseItem>, Error = Infallible>,
{
    if let SendableMessage::Invalid { id } = message {
        return Some(ResponseItem::error(id, invalid_request("Invalid request")));
    }

    let service = match service.ready().await {
        Ok(service) => service,
        Err(never) => match never {},
    };
    match service.call(message).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

impl<S> Service<Request> for RequestService<S>
where
    S: Service<SendableMessage, Response = Option<ResponseItem>, Error = Infallible>
        + Clone
        + 'static,
    S::Future: 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        Box::pin(async move {
            match request {
                Request::Single(message) => Ok(Response::Single(
                    handle_message(&mut inner, message).await,
                )),
                Request::Batch(messages) if messages.is_empty() => {
                    Ok(Response::Single(Some(ResponseItem::error(
                        RequestId::Null,
                        invalid_request("Invalid request: batch is empty"),
                    ))))
                }
                Request::Batch(messages) => {
                    let mut responses = Vec::with_capacity(messages.len());
                    for message in messages {
                        if let Some(response) = handle_message(&mut inner, message).await {
                            responses.push(response);
                        }
                    }
                    Ok(Response::Batch(responses))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::ResourceDescriptor, CatalogServiceBuilder, Registry, StaticContent};
    use folio_protocol::jsonrpc::{MethodCall, Notification};

    fn service() -> RequestService<crate::CatalogService> {
        let registry = Registry::builder("test")
            .with_resource(ResourceDescriptor::new(
                "test://guides/intro",
                "Intro",
                "Introduction",
                StaticContent::new("# Intro"),
            ))
            .build()
            .unwrap();
        CatalogServiceBuilder::new("Test".into(), "Test server".into())
            .with_registry(registry)
            .build()
            .into_request_service()
    }

    fn ping(id: u64) -> SendableMessage {
        MethodCall::new(RequestId::Num(id), "ping".into(), None).into()
    }

    #[tokio::test]
    async fn batch_keeps_order_and_drops_notifications() {
        let mut service = service();
        let request = Request::Batch(vec![
            ping(1),
            Notification::new("notifications/initialized".into(), None).into(),
            ping(2),
        ]);

        let Response::Batch(responses) = service.call(request).await.unwrap() else {
            panic!("expected a batch response");
        };
        let ids: Vec<_> = responses.iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec![RequestId::Num(1), RequestId::Num(2)]);
    }

    #[tokio::test]
    async fn single_notification_has_no_response() {
        let mut service = service();
        let request = Request::Single(Notification::new("notifications/initialized".into(), None).into());
        let response = service.call(request).await.unwrap();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn invalid_message_echoes_id() {
        let mut service = service();
        let request = Request::Single(SendableMessage::Invalid {
            id: RequestId::Str("abc".into()),
        });
        let Response::Single(Some(ResponseItem::Error { id, error, .. })) =
            service.call(request).await.unwrap()
        else {
            panic!("expected an error response");
        };
        assert_eq!(id, RequestId::Str("abc".into()));
        assert_eq!(error.code, ErrorCode::InvalidRequest);
        assert_eq!(error.message, "Invalid request");
    }
}
