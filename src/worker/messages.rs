//! Worker thread message types for cross-thread communication.
//!
//! The plugin thread asks the cache worker to read or replace the persisted
//! catalog; the worker answers with one [`WorkerResponse`] per message. Both
//! directions travel as JSON, and requests carry the caller's trace context so
//! worker spans join the plugin's trace.

use crate::storage::CachedCatalog;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the active span.
    ///
    /// Returns `None` when no valid OpenTelemetry span is active, which is the
    /// case whenever tracing export is disabled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_cache(LoadCache { key: String }),
    store_cache(StoreCache { key: String, entry: CachedCatalog }),
}

/// Messages sent from the plugin thread to the cache worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the cached catalog stored under `key`.
    LoadCache {
        key: String,

        #[serde(skip_serializing_if = "Option::is_none", default)]
        trace_context: Option<TraceContext>,
    },

    /// Replace the cached catalog stored under `key`.
    StoreCache {
        key: String,
        entry: CachedCatalog,

        #[serde(skip_serializing_if = "Option::is_none", default)]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    pub(crate) const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadCache { trace_context, .. } | Self::StoreCache { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }

    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::LoadCache { .. } => "load_cache",
            Self::StoreCache { .. } => "store_cache",
        }
    }
}

/// Responses sent from the cache worker back to the plugin thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A cached catalog was found.
    CacheLoaded { entry: CachedCatalog },

    /// Nothing is cached under the requested key.
    CacheMissing,

    /// The catalog was written.
    CacheStored { record_count: usize },

    /// The operation failed.
    Error {
        /// Human-readable error message.
        message: String,

        /// Whether the failure happened while reading the cache.
        #[serde(default)]
        during_load: bool,
    },
}
