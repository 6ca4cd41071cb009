//! Server configuration.

use crate::lexer::TokenizerLimits;

/// Settings fixed for the lifetime of a server instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub limits: TokenizerLimits,
}

impl ServerConfig {
    /// Override the largest document, in bytes, the server will tokenize.
    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.limits.max_input_bytes = bytes;
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.limits.max_tokens = tokens;
        self
    }
}
