use thiserror::Error;
use tower_lsp::jsonrpc;

/// Conditions under which tokenization gives up on a document entirely.
///
/// Malformed lexemes never produce one of these; they are reported as
/// [`LexDiagnostic`](super::LexDiagnostic)s instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("document is {len} bytes, above the {limit} byte tokenizer limit")]
    InputTooLarge { len: usize, limit: usize },

    #[error("document produced more than {limit} tokens")]
    TooManyTokens { limit: usize },
}

impl From<TokenizeError> for jsonrpc::Error {
    fn from(err: TokenizeError) -> Self {
        jsonrpc::Error {
            code: jsonrpc::ErrorCode::InternalError,
            message: err.to_string().into(),
            data: None,
        }
    }
}
