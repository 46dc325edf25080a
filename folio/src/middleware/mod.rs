//! Tower layers for message-level services.

mod tracing;
pub use self::tracing::{TracingLayer, TracingService};
