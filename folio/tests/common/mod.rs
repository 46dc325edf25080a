use folio::{
    from_fn, prompt, CatalogService, CatalogServiceBuilder, ProducerError, Registry,
    ResourceDescriptor, StaticContent,
};
use folio_protocol::jsonrpc::{MethodCall, Params, RequestId, ResponseItem, SendableMessage};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::Service;
use tracing_subscriber::EnvFilter;

pub const SCHEME: &str = "acme";
pub const GUIDE_URI: &str = "acme://guides/onboarding";
pub const BROKEN_URI: &str = "acme://guides/broken";

pub async fn call_server(
    server: &mut CatalogService,
    method: &str,
    params: serde_json::Value,
) -> Option<ResponseItem> {
    let params = match params {
        serde_json::Value::Object(map) => Some(Params::Map(map)),
        serde_json::Value::Array(array) => Some(Params::Array(array)),
        _ => None,
    };

    let request = MethodCall::new(RequestId::Num(1), method.to_string(), params);
    let future = server.call(SendableMessage::from(request));

    future.await.unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[prompt(
    description = "Draft a welcome email for a new customer",
    params(customer = "Customer name", tone = "Tone of voice"),
    defaults(tone = "friendly")
)]
pub async fn welcome_email(customer: String, tone: Option<String>) -> String {
    format!(
        "Write a {} welcome email for {}.",
        tone.unwrap_or_default(),
        customer
    )
}

/// A registry with one working guide, and one whose producer always fails.
///
/// The returned counter records how many times the working guide's content was produced.
pub fn init_registry() -> (Registry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let registry = Registry::builder(SCHEME)
        .with_resource(ResourceDescriptor::new(
            GUIDE_URI,
            "Onboarding",
            "How new customers are onboarded",
            from_fn(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok::<_, ProducerError>("# Onboarding\n\nStep one.".to_string())
                }
            }),
        ))
        .with_resource(
            ResourceDescriptor::new(
                "acme://reference/glossary",
                "Glossary",
                "Terms used across the guides",
                StaticContent::new("term: definition"),
            )
            .with_mime_type("text/plain"),
        )
        .with_resource(ResourceDescriptor::new(
            BROKEN_URI,
            "Broken",
            "A guide that cannot be loaded",
            from_fn(|| async {
                Err::<String, _>(ProducerError::Failed("disk on fire".to_string()))
            }),
        ))
        .build()
        .unwrap();

    (registry, calls)
}

pub fn init_catalog_server() -> CatalogService {
    init_catalog_server_counted().0
}

pub fn init_catalog_server_counted() -> (CatalogService, Arc<AtomicUsize>) {
    init_tracing();
    let (registry, calls) = init_registry();
    let service = CatalogServiceBuilder::new("Acme Docs".to_string(), "Acme guides".to_string())
        .with_registry(registry)
        .with_prompt(WelcomeEmail)
        .build();
    (service, calls)
}

pub fn expect_success(response: Option<ResponseItem>) -> serde_json::Value {
    match response {
        Some(ResponseItem::Success { result, .. }) => result,
        other => panic!("Expected success response, got {other:?}"),
    }
}

pub fn expect_error(response: Option<ResponseItem>) -> folio_protocol::jsonrpc::ErrorData {
    match response {
        Some(ResponseItem::Error { error, .. }) => error,
        other => panic!("Expected error response, got {other:?}"),
    }
}
