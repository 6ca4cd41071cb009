//! In-process LSP harness shared by the integration tests.
//!
//! The backend is built through `LspService` exactly as the binary builds it,
//! and its `LanguageServer` methods are called directly.

#![allow(dead_code)]

use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams, Position, Range,
    SemanticTokensParams, SemanticTokensResult, TextDocumentContentChangeEvent, TextDocumentIdentifier,
    TextDocumentItem, Url, VersionedTextDocumentIdentifier,
};
use tower_lsp::{ClientSocket, LanguageServer, LspService};

use qasm_language_server::QasmBackend;
use qasm_language_server::config::ServerConfig;
use qasm_language_server::semantic::flatten;

pub struct TestServer {
    service: LspService<QasmBackend>,
    _socket: ClientSocket,
    version: i32,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let _ = qasm_language_server::logging::init_logger(true, Some("warn"), false);
        let (service, socket) = LspService::build(|client| QasmBackend::with_config(client, config))
            .custom_method("$/setTrace", QasmBackend::set_trace)
            .finish();
        Self {
            service,
            _socket: socket,
            version: 0,
        }
    }

    pub fn backend(&self) -> &QasmBackend {
        self.service.inner()
    }

    pub async fn open(&mut self, uri: &Url, text: &str) {
        self.version += 1;
        self.backend()
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri.clone(),
                    language_id: "qasm".to_string(),
                    version: self.version,
                    text: text.to_string(),
                },
            })
            .await;
    }

    pub async fn change(&mut self, uri: &Url, content_changes: Vec<TextDocumentContentChangeEvent>) {
        self.version += 1;
        self.backend()
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: self.version,
                },
                content_changes,
            })
            .await;
    }

    pub async fn replace(&mut self, uri: &Url, text: &str) {
        self.change(uri, vec![full_change(text)]).await;
    }

    pub async fn close(&self, uri: &Url) {
        self.backend()
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
            })
            .await;
    }

    pub async fn request_tokens(&self, uri: &Url) -> jsonrpc::Result<Option<SemanticTokensResult>> {
        self.backend()
            .semantic_tokens_full(SemanticTokensParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
    }

    /// Packed `data` of a successful semantic-tokens response.
    pub async fn tokens(&self, uri: &Url) -> Vec<u32> {
        match self.request_tokens(uri).await {
            Ok(Some(SemanticTokensResult::Tokens(tokens))) => flatten(&tokens.data),
            other => panic!("unexpected semantic tokens response: {:?}", other),
        }
    }
}

pub fn uri(path: &str) -> Url {
    Url::parse(path).unwrap()
}

pub fn full_change(text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: None,
        range_length: None,
        text: text.to_string(),
    }
}

pub fn range_change(start: (u32, u32), end: (u32, u32), text: &str) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))),
        range_length: None,
        text: text.to_string(),
    }
}

/// Decode packed data into absolute `(line, column, length, type)` tuples
/// with zero-based lines.
pub fn decode_absolute(data: &[u32]) -> Vec<(u32, u32, u32, u32)> {
    let mut line = 0;
    let mut column = 0;
    data.chunks(5)
        .map(|chunk| {
            if chunk[0] == 0 {
                column += chunk[1];
            } else {
                line += chunk[0];
                column = chunk[1];
            }
            (line, column, chunk[2], chunk[3])
        })
        .collect()
}

/// Legend indices of each token, in order.
pub fn token_types(data: &[u32]) -> Vec<u32> {
    data.chunks(5).map(|chunk| chunk[3]).collect()
}
