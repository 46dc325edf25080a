pub mod content;
pub use content::{Annotations, Content, TextContent};
pub mod jsonrpc;
pub mod messages;
pub mod prompt;
pub mod resource;
