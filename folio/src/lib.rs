//! folio is a framework for [Model Context Protocol][mcp-spec] (MCP) servers whose job is to serve
//! content: markdown guides, reference documents and prompt templates.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio::{serve, CatalogServiceBuilder, Registry, ResourceDescriptor, ServiceExt, StaticContent};
//! use folio::transport::StdioTransport;
//! use folio::errors::ServerError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let registry = Registry::builder("docs")
//!         .with_resource(ResourceDescriptor::new(
//!             "docs://guides/intro",
//!             "Introduction",
//!             "Where to start",
//!             StaticContent::new("# Introduction"),
//!         ))
//!         .build()?;
//!
//!     let service = CatalogServiceBuilder::new("Docs".into(), "A documentation server".into())
//!         .with_registry(registry)
//!         .build();
//!
//!     Ok(serve(service.into_request_service(), StdioTransport::new()).await?)
//! }
//! ```
//!
//! # Resources
//!
//! Every resource is declared up front in a [`Registry`], as a [`ResourceDescriptor`] pairing
//! metadata with a [`ContentProducer`]. Listing resources never touches content. Content is
//! produced the first time a resource is read, then cached for the life of the process. A failed
//! load is recorded in the registry's error log and retried on the next read.
//!
//! Registries can also discover `README*.md` files in a directory at startup; see
//! [`discovery`].
//!
//! # Prompts
//!
//! Prompts are plain Rust functions annotated with [`prompt`]. Parameters become prompt arguments;
//! `Option` parameters are optional, and `defaults(...)` fills in missing values.
//!
//! ```rust,ignore
//! #[prompt(
//!     description = "Draft a kickoff agenda",
//!     params(client = "Who the project is for"),
//!     defaults(client = "client")
//! )]
//! async fn kickoff(client: String) -> String {
//!     format!("Draft a kickoff agenda for {client}.")
//! }
//! ```
//!
//! # Logging
//!
//! folio uses tokio's tracing throughout. When serving over stdio, stdout carries the protocol, so
//! applications must send their logs elsewhere, for example to a file:
//!
//! ```rust,ignore
//! let file_appender = tracing_appender::rolling::daily(log_dir, "server.log");
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::from_default_env())
//!     .with_writer(file_appender)
//!     .with_ansi(false)
//!     .init();
//! ```
//!
//! [mcp-spec]: https://modelcontextprotocol.io/specification/2024-11-05/

extern crate self as folio;

pub mod discovery;
pub mod errors;
mod handler;
pub mod loader;
pub mod middleware;
pub mod producer;
pub mod prompts;
pub mod registry;
pub mod response;
mod serve;
mod service;
mod service_ext;
pub mod transport;

// aliases
pub use handler::PromptHandler;
pub use producer::{from_fn, ContentProducer, FileContent, ProducerError, StaticContent};
pub use registry::{Registry, RegistryBuilder, ResourceDescriptor};
pub use response::IntoPromptMessages;
pub use serve::serve;
pub use service::{CatalogService, CatalogServiceBuilder};
pub use service_ext::{RequestService, ServiceExt};

// re-export certain MCP protocol types
pub use folio_protocol::{
    content::Role,
    prompt::{PromptArgument, PromptError, PromptMessage},
    resource::ResourceError,
};

// re-export macros
pub use folio_macros::prompt;

#[doc(hidden)]
pub mod __private {
    pub use crate::handler::argument_text;
    pub use async_trait::async_trait;
    pub use serde_json;
}
