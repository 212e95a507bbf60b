//! Cache worker: owns the persistent cache and serves plugin requests.
//!
//! The worker runs on a thread spawned by Zellij. The plugin binary registers a
//! thin shim around [`CatalogWorker`] and forwards every payload to
//! [`CatalogWorker::handle_payload`].

use crate::domain::error::{ChordsourceError, Result};
use crate::infrastructure::paths;
use crate::storage::{JsonFileCache, PersistentCache};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Worker state. The cache backend is opened lazily on the first message.
#[derive(Default)]
pub struct CatalogWorker {
    cache: Option<Box<dyn PersistentCache>>,
}

impl std::fmt::Debug for CatalogWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWorker")
            .field("initialized", &self.cache.is_some())
            .finish()
    }
}

impl CatalogWorker {
    /// Creates a worker over an already opened cache.
    #[must_use]
    pub fn with_cache(cache: Box<dyn PersistentCache>) -> Self {
        Self { cache: Some(cache) }
    }

    fn cache(&mut self) -> Result<&mut Box<dyn PersistentCache>> {
        if self.cache.is_none() {
            let dir = paths::get_data_dir();
            tracing::debug!(dir = ?dir, "opening catalog cache");
            self.cache = Some(Box::new(JsonFileCache::new(dir)?));
        }
        self.cache
            .as_mut()
            .ok_or_else(|| ChordsourceError::Worker("cache not initialized".to_string()))
    }

    fn handle_load(&mut self, key: &str) -> WorkerResponse {
        match self.cache().and_then(|cache| cache.get(key)) {
            Ok(Some(entry)) => {
                tracing::debug!(record_count = entry.data.len(), hash = ?entry.hash, "cache hit");
                WorkerResponse::CacheLoaded { entry }
            }
            Ok(None) => {
                tracing::debug!("cache miss");
                WorkerResponse::CacheMissing
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache load failed");
                WorkerResponse::Error {
                    message: format!("load cache: {e}"),
                    during_load: true,
                }
            }
        }
    }

    fn handle_store(&mut self, key: &str, entry: &crate::storage::CachedCatalog) -> WorkerResponse {
        let record_count = entry.data.len();
        match self.cache().and_then(|cache| cache.set(key, entry)) {
            Ok(()) => {
                tracing::debug!(record_count, "cache stored");
                WorkerResponse::CacheStored { record_count }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache store failed");
                WorkerResponse::Error {
                    message: format!("store cache: {e}"),
                    during_load: false,
                }
            }
        }
    }

    /// Reconstructs the plugin thread's span context so worker spans link to it.
    ///
    /// The returned guard must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }

    /// Processes one message.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = message.kind()).entered();

        match message {
            WorkerMessage::LoadCache { key, .. } => self.handle_load(&key),
            WorkerMessage::StoreCache { key, entry, .. } => self.handle_store(&key, &entry),
        }
    }

    /// Decodes a JSON payload, handles it, and encodes the response.
    ///
    /// Returns `None` if the response cannot be serialized. A payload that is
    /// not a valid message is answered with [`WorkerResponse::Error`].
    #[must_use]
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let response = match serde_json::from_str::<WorkerMessage>(payload) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: format!("invalid worker message: {e}"),
                    during_load: false,
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CatalogRecord;
    use crate::storage::CachedCatalog;

    fn worker() -> (tempfile::TempDir, CatalogWorker) {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::new(dir.path().to_path_buf()).unwrap();
        (dir, CatalogWorker::with_cache(Box::new(cache)))
    }

    fn entry() -> CachedCatalog {
        CachedCatalog::new(
            vec![CatalogRecord::new("1", "ใจความสำคัญ", "Musketeers", "https://example.com/1")],
            Some("h1".into()),
        )
    }

    #[test]
    fn load_before_store_is_missing() {
        let (_dir, mut worker) = worker();
        let response = worker.handle_message(WorkerMessage::load_cache("chordsource".into()));
        assert_eq!(response, WorkerResponse::CacheMissing);
    }

    #[test]
    fn store_then_load_round_trips_through_json() {
        let (_dir, mut worker) = worker();
        let request = serde_json::to_string(&WorkerMessage::store_cache("chordsource".into(), entry())).unwrap();
        let reply: WorkerResponse = serde_json::from_str(&worker.handle_payload(&request).unwrap()).unwrap();
        assert_eq!(reply, WorkerResponse::CacheStored { record_count: 1 });

        let request = serde_json::to_string(&WorkerMessage::load_cache("chordsource".into())).unwrap();
        let reply: WorkerResponse = serde_json::from_str(&worker.handle_payload(&request).unwrap()).unwrap();
        assert_eq!(reply, WorkerResponse::CacheLoaded { entry: entry() });
    }

    #[test]
    fn invalid_key_reports_load_error() {
        let (_dir, mut worker) = worker();
        let response = worker.handle_message(WorkerMessage::load_cache("../x".into()));
        assert!(matches!(response, WorkerResponse::Error { during_load: true, .. }));
    }

    #[test]
    fn garbage_payload_is_an_error_response() {
        let (_dir, mut worker) = worker();
        let reply: WorkerResponse = serde_json::from_str(&worker.handle_payload("{").unwrap()).unwrap();
        assert!(matches!(reply, WorkerResponse::Error { during_load: false, .. }));
    }
}
