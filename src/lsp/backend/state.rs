use std::sync::Arc;

use parking_lot::Mutex;
use tower_lsp::Client;
use tower_lsp::lsp_types::{SemanticToken, SetTraceParams, TraceValue};
use tracing::{debug, info, trace};

use crate::config::ServerConfig;
use crate::lexer::{TokenizeError, tokenize_with_limits};
use crate::lsp::document_store::DocumentStore;
use crate::semantic::encode;

/// The OpenQASM language server backend.
#[derive(Clone)]
pub struct QasmBackend {
    pub(super) client: Client,
    pub(super) documents: Arc<DocumentStore>,
    pub(super) trace: Arc<Mutex<TraceValue>>,
    pub(super) config: ServerConfig,
}

impl std::fmt::Debug for QasmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QasmBackend")
            .field("documents_count", &self.documents.len())
            .field("trace", &*self.trace.lock())
            .field("config", &self.config)
            .finish()
    }
}

impl QasmBackend {
    pub fn new(client: Client) -> Self {
        Self::with_config(client, ServerConfig::default())
    }

    pub fn with_config(client: Client, config: ServerConfig) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            trace: Arc::new(Mutex::new(TraceValue::Off)),
            config,
        }
    }

    /// Handler for the `$/setTrace` notification. Never fails.
    pub async fn set_trace(&self, params: SetTraceParams) {
        info!("Trace set to {:?}", params.value);
        *self.trace.lock() = params.value;
    }

    pub fn trace_value(&self) -> TraceValue {
        *self.trace.lock()
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Tokenize and encode `text` under the configured limits.
    pub fn semantic_tokens_for(&self, text: &str) -> Result<Vec<SemanticToken>, TokenizeError> {
        let tokenized = tokenize_with_limits(text, &self.config.limits)?;
        let data = encode(&tokenized.tokens);
        debug!(
            "Tokenized {} bytes into {} tokens ({} encoded, {} diagnostics)",
            text.len(),
            tokenized.tokens.len(),
            data.len(),
            tokenized.diagnostics.len()
        );
        trace!(
            "Tokens: {}",
            serde_json::to_string(&tokenized.tokens).unwrap_or_else(|e| format!("<unserializable: {}>", e))
        );
        Ok(data)
    }
}
