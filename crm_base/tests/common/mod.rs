use folio::{
    discovery::DiscoveryConfig, CatalogService, ServiceExt, RequestService,
};
use folio_protocol::jsonrpc::{MethodCall, Params, Request, RequestId, Response, ResponseItem};
use tower::Service;

pub fn init_server(discovery: Option<DiscoveryConfig>) -> CatalogService {
    let registry = crm_base::registry(discovery).unwrap();
    crm_base::service(registry)
}

pub async fn call_server(
    server: &mut RequestService<CatalogService>,
    method: &str,
    params: serde_json::Value,
) -> ResponseItem {
    let params = match params {
        serde_json::Value::Object(map) => Some(Params::Map(map)),
        serde_json::Value::Array(array) => Some(Params::Array(array)),
        _ => None,
    };

    let request = MethodCall::new(RequestId::Num(1), method.to_string(), params);
    match server.call(Request::Single(request.into())).await.unwrap() {
        Response::Single(Some(item)) => item,
        other => panic!("Expected a single response, got {other:?}"),
    }
}

pub fn request_service(discovery: Option<DiscoveryConfig>) -> RequestService<CatalogService> {
    init_server(discovery).into_request_service()
}

pub fn result(item: ResponseItem) -> serde_json::Value {
    match item {
        ResponseItem::Success { result, .. } => result,
        ResponseItem::Error { error, .. } => panic!("Expected success, got {error:?}"),
    }
}
