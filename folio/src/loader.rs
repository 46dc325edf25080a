//! Lazy, memoising content loading.
//!
//! Each identifier owns a slot holding a [`tokio::sync::OnceCell`] for the content and an async
//! mutex serialising producer invocations. The slot is installed before the producer is awaited,
//! so concurrent loads of the same identifier queue on the mutex instead of invoking the producer
//! again. Callers that were queued behind a failed attempt receive that attempt's error; a failed
//! load leaves the cell empty, so the next caller retries. Successful loads are never evicted.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::producer::ContentProducer;

/// How many failed loads the error log remembers.
pub const ERROR_LOG_CAPACITY: usize = 100;

/// A producer failed to yield content for `identifier`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to load {identifier}: {message}")]
pub struct LoadError {
    pub identifier: String,
    pub message: String,
}

/// A record of one failed load attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLogEntry {
    pub identifier: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Ring buffer of recent load failures. Once full, the oldest entry is dropped for each new one.
#[derive(Debug)]
pub struct ErrorLog {
    entries: Mutex<VecDeque<ErrorLogEntry>>,
    capacity: usize,
}

impl ErrorLog {
    pub fn with_capacity(capacity: usize) -> Self {
        ErrorLog {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, identifier: &str, message: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity.max(1) {
            entries.pop_front();
        }
        entries.push_back(ErrorLogEntry {
            identifier: identifier.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// A copy of the log, oldest entry first.
    pub fn snapshot(&self) -> Vec<ErrorLogEntry> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        ErrorLog::with_capacity(ERROR_LOG_CAPACITY)
    }
}

#[derive(Debug, Default)]
struct Slot {
    content: OnceCell<String>,
    /// Held for the duration of a producer invocation. Holds the error of the latest failure.
    attempt: tokio::sync::Mutex<Option<LoadError>>,
    /// Bumped after every failed attempt, so queued callers can tell one completed while they
    /// waited.
    failures: AtomicU64,
}

/// Loads content through producers, memoising successes and logging failures.
#[derive(Debug, Default)]
pub struct Loader {
    cache: Mutex<HashMap<String, Arc<Slot>>>,
    errors: ErrorLog,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_capacity(capacity: usize) -> Self {
        Loader {
            cache: Mutex::default(),
            errors: ErrorLog::with_capacity(capacity),
        }
    }

    /// Return the content for `identifier`, invoking `producer` only if nothing is cached yet.
    ///
    /// `identifier` is the normalised lookup key (scheme already stripped).
    #[tracing::instrument(level = "debug", skip(self, producer))]
    pub async fn load(
        &self,
        identifier: &str,
        producer: &dyn ContentProducer,
    ) -> Result<String, LoadError> {
        let slot = self.slot(identifier);
        if let Some(content) = slot.content.get() {
            tracing::debug!("Cache hit");
            return Ok(content.clone());
        }

        let seen_failures = slot.failures.load(Ordering::Acquire);
        let mut last_failure = slot.attempt.lock().await;

        if let Some(content) = slot.content.get() {
            tracing::debug!("Cache hit after waiting for an in-flight load");
            return Ok(content.clone());
        }
        if slot.failures.load(Ordering::Acquire) != seen_failures {
            if let Some(err) = last_failure.as_ref() {
                tracing::debug!("In-flight load failed, sharing its error");
                return Err(err.clone());
            }
        }

        tracing::debug!("Cache miss, invoking producer");
        match producer.produce().await {
            Ok(content) => {
                *last_failure = None;
                // Only set while the attempt lock is held, so the cell is still empty here.
                let _ = slot.content.set(content.clone());
                Ok(content)
            }
            Err(e) => {
                let err = LoadError {
                    identifier: identifier.to_string(),
                    message: e.to_string(),
                };
                tracing::error!(error = %e, "Failed to load resource content");
                self.errors.record(&err.identifier, &err.message);
                *last_failure = Some(err.clone());
                slot.failures.fetch_add(1, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Whether `identifier` has been loaded successfully.
    pub fn is_cached(&self, identifier: &str) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .is_some_and(|slot| slot.content.initialized())
    }

    /// Number of identifiers with cached content.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.content.initialized())
            .count()
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.errors
    }

    /// Get the slot for `identifier`, installing an empty one if needed. The lock is released
    /// before the caller awaits anything.
    fn slot(&self, identifier: &str) -> Arc<Slot> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(identifier.to_string()).or_default())
    }
}
