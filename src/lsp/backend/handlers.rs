//! `tower_lsp::LanguageServer` implementation for the OpenQASM backend:
//! lifecycle (initialize, initialized, shutdown), document sync
//! (did_open, did_change, did_close) and semantic_tokens_full.

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams, InitializeParams,
    InitializeResult, InitializedParams, MessageType, SemanticTokens, SemanticTokensFullOptions,
    SemanticTokensOptions, SemanticTokensParams, SemanticTokensResult, SemanticTokensServerCapabilities,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind, TraceValue,
};
use tower_lsp::{LanguageServer, jsonrpc};
use tracing::{debug, error, info, warn};

use super::state::QasmBackend;
use crate::semantic::semantic_tokens_legend;

pub const SERVER_NAME: &str = "qasm";

fn empty_tokens() -> SemanticTokensResult {
    SemanticTokensResult::Tokens(SemanticTokens {
        result_id: None,
        data: Vec::new(),
    })
}

#[tower_lsp::async_trait]
impl LanguageServer for QasmBackend {
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        info!("Received initialize");
        debug!("Initialize params: {:?}", params);
        info!("Tokenizer limits: {:?}", self.config().limits);

        if let Some(trace) = params.trace {
            *self.trace.lock() = trace;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                semantic_tokens_provider: Some(SemanticTokensServerCapabilities::SemanticTokensOptions(
                    SemanticTokensOptions {
                        legend: semantic_tokens_legend(),
                        full: Some(SemanticTokensFullOptions::Bool(true)),
                        range: Some(false),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Initialized");
        self.client
            .log_message(MessageType::INFO, "OpenQASM language server initialized")
            .await;
    }

    async fn shutdown(&self) -> LspResult<()> {
        info!("Received shutdown request");
        *self.trace.lock() = TraceValue::Off;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        info!(
            "Opening document: URI={}, version={}, {} bytes",
            document.uri,
            document.version,
            document.text.len()
        );
        self.documents.put(document.uri, document.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        info!(
            "Changing document: URI={}, version={}, {} change(s)",
            uri,
            params.text_document.version,
            params.content_changes.len()
        );
        if self.documents.get(&uri).is_none() {
            warn!("didChange for unopened document {}; starting from empty text", uri);
        }
        let text = self.documents.apply_changes(&uri, &params.content_changes);
        debug!("Document {} is now {} bytes", uri, text.len());
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.documents.remove(&uri) {
            info!("Closed document: {}", uri);
        } else {
            warn!("Failed to find document with URI={}", uri);
        }
    }

    async fn semantic_tokens_full(&self, params: SemanticTokensParams) -> LspResult<Option<SemanticTokensResult>> {
        let uri = params.text_document.uri;
        debug!("Semantic tokens request for: {}", uri);

        let Some(text) = self.documents.get(&uri) else {
            debug!("No document stored for {}; returning no tokens", uri);
            return Ok(Some(empty_tokens()));
        };

        match self.semantic_tokens_for(&text) {
            Ok(data) => Ok(Some(SemanticTokensResult::Tokens(SemanticTokens { result_id: None, data }))),
            Err(err) => {
                error!("Tokenization of {} failed: {}", uri, err);
                Err(err.into())
            }
        }
    }
}
