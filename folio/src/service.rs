use crate::{
    errors::RequestError,
    handler::PromptHandler,
    prompts::PromptTable,
    registry::Registry,
    response::{wrap_prompt_list, wrap_prompt_response, wrap_resource, wrap_resource_list},
};
use folio_protocol::{
    jsonrpc::{ErrorData, MethodCall, Params, ResponseItem, SendableMessage},
    messages::{
        Implementation, InitializeResult, PromptsCapability, ResourcesCapability,
        ServerCapabilities, PROTOCOL_VERSION,
    },
};
use serde::Serialize;
use serde_json::{json, Value};
use std::{collections::HashMap, convert::Infallible, future::Future, pin::Pin, rc::Rc, task::Poll};
use tower::Service;

/// A service that handles MCP requests for one catalog server.
///
/// The `CatalogService` answers `MethodCall`s, whatever their origin (including as library calls),
/// with `ResponseItem`s. It holds the resource registry and prompt table, both fixed once the
/// service is built. Running the request loop against a transport is the job of [`serve`].
///
/// [`serve`]: crate::serve
#[derive(Clone)]
pub struct CatalogService {
    name: String,
    instructions: String,
    registry: Rc<Registry>,
    prompts: Rc<PromptTable>,
}

/// Build a CatalogService. Resources and prompts are defined when the service is built. They cannot
/// be modified after that time.
pub struct CatalogServiceBuilder {
    name: String,
    instructions: String,
    registry: Option<Registry>,
    prompts: PromptTable,
}

impl CatalogServiceBuilder {
    pub fn new(name: String, instructions: String) -> Self {
        Self {
            name,
            instructions,
            registry: None,
            prompts: PromptTable::new(),
        }
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_prompt(mut self, prompt: impl PromptHandler) -> Self {
        self.prompts.insert(prompt);
        self
    }

    pub fn build(self) -> CatalogService {
        let registry = self
            .registry
            .unwrap_or_else(|| Registry::empty(self.name.to_lowercase()));
        CatalogService {
            name: self.name,
            instructions: self.instructions,
            registry: Rc::new(registry),
            prompts: Rc::new(self.prompts),
        }
    }
}

impl CatalogService {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn prompts(&self) -> &PromptTable {
        &self.prompts
    }

    /// Capabilities follow what was registered. Nothing changes after build, so `list_changed` is
    /// always false.
    fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            prompts: (!self.prompts.is_empty()).then_some(PromptsCapability {
                list_changed: Some(false),
            }),
            resources: (!self.registry.is_empty()).then_some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: Some(false),
            }),
        }
    }
}

/// Validate and return request parameters
fn get_request_params(params: Option<Params>) -> Result<serde_json::Map<String, Value>, RequestError> {
    match params {
        Some(Params::Map(map)) => Ok(map),
        Some(_) => Err(RequestError::InvalidParams(
            "Parameters must be a map-like object".to_string(),
        )),
        None => Err(RequestError::InvalidParams(
            "The request was empty".to_string(),
        )),
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, RequestError> {
    serde_json::to_value(value)
        .map_err(|e| RequestError::Internal(format!("JSON serialization error: {}", e)))
}

/// Handlers only perform *syntactic* validation of parameters. Whether a resource or prompt exists
/// is decided by the registry and prompt table.
impl CatalogService {
    fn handle_initialize(&self) -> Result<Value, RequestError> {
        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: self.capabilities(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(self.instructions.clone()),
        })
    }

    fn handle_resources_list(&self) -> Result<Value, RequestError> {
        // No request arguments required.
        to_result(wrap_resource_list(self.registry.list()))
    }

    async fn handle_resources_read(&self, params: Option<Params>) -> Result<Value, RequestError> {
        let params = get_request_params(params)?;
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| RequestError::InvalidParams("Missing resource URI".into()))?;

        let loaded = self.registry.read(uri).await?;
        to_result(wrap_resource(uri, loaded.text, loaded.descriptor.mime_type()))
    }

    fn handle_prompts_list(&self) -> Result<Value, RequestError> {
        to_result(wrap_prompt_list(self.prompts.list()))
    }

    async fn handle_prompts_get(&self, params: Option<Params>) -> Result<Value, RequestError> {
        let params = get_request_params(params)?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RequestError::InvalidParams("Missing prompt name".into()))?;

        // An absent arguments object is the same as an empty one.
        let arguments: HashMap<String, Value> = match params.get("arguments") {
            None | Some(Value::Null) => HashMap::new(),
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Some(_) => {
                return Err(RequestError::InvalidParams(
                    "Prompt arguments must be an object".into(),
                ))
            }
        };

        let messages = self.prompts.render(name, arguments).await?;
        let description = self.prompts.get(name).and_then(|p| p.description());
        to_result(wrap_prompt_response(description, messages))
    }

    async fn handle_request(&self, req: MethodCall) -> ResponseItem {
        let result = match req.method.as_str() {
            "ping" => Ok(json!({})),
            "initialize" => self.handle_initialize(),
            "resources/list" => self.handle_resources_list(),
            "resources/read" => self.handle_resources_read(req.params).await,
            "prompts/list" => self.handle_prompts_list(),
            "prompts/get" => self.handle_prompts_get(req.params).await,
            _ => Err(RequestError::MethodNotFound(req.method)),
        };

        match result {
            Ok(result) => ResponseItem::success(req.id, result),
            Err(e) => {
                tracing::debug!(error = %e, "Request failed");
                ResponseItem::error(req.id, ErrorData::from(e))
            }
        }
    }
}

impl Service<SendableMessage> for CatalogService {
    type Response = Option<ResponseItem>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    /// Returns a future that handles the message and resolves to an (optional) JSON-RPC response.
    /// Notifications and invalid messages produce no response here; invalid messages are answered
    /// by the request-level service.
    fn call(&mut self, req: SendableMessage) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            match req {
                SendableMessage::Request(req) => Ok(Some(this.handle_request(req).await)),
                SendableMessage::Notification(_) | SendableMessage::Invalid { .. } => Ok(None),
            }
        })
    }
}
