//! Content producers: the units of logic that yield a resource's text when invoked.
//!
//! A producer is only ever invoked through the [`Loader`](crate::loader::Loader), which memoises
//! the first successful result. Producers themselves should therefore not cache anything.

use std::{borrow::Cow, future::Future, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// A failed attempt to produce content.
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),
}

/// Anything that can produce the text of a resource.
#[async_trait]
pub trait ContentProducer: Send + Sync + 'static {
    async fn produce(&self) -> Result<String, ProducerError>;
}

/// Content held in memory, typically a document compiled into the binary with `include_str!`.
#[derive(Debug, Clone)]
pub struct StaticContent(Cow<'static, str>);

impl StaticContent {
    pub const fn new(text: &'static str) -> Self {
        StaticContent(Cow::Borrowed(text))
    }

    pub fn owned(text: String) -> Self {
        StaticContent(Cow::Owned(text))
    }
}

#[async_trait]
impl ContentProducer for StaticContent {
    async fn produce(&self) -> Result<String, ProducerError> {
        Ok(self.0.to_string())
    }
}

/// Content read from a file at load time. Nothing is read when the producer is constructed.
#[derive(Debug, Clone)]
pub struct FileContent {
    path: PathBuf,
}

impl FileContent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileContent { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ContentProducer for FileContent {
    async fn produce(&self) -> Result<String, ProducerError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ProducerError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// A producer backed by an async closure. See [`from_fn`].
pub struct FnProducer<F>(F);

/// Build a producer from a closure returning a future, eg for content generated at request time.
///
/// ```rust,ignore
/// let producer = folio::producer::from_fn(|| async { Ok(render_changelog().await) });
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnProducer<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ProducerError>> + Send,
{
    FnProducer(f)
}

#[async_trait]
impl<F, Fut> ContentProducer for FnProducer<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ProducerError>> + Send,
{
    async fn produce(&self) -> Result<String, ProducerError> {
        (self.0)().await
    }
}
