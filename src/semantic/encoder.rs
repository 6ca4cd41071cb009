//! Delta encoding of classified tokens into the LSP packed representation.

use tower_lsp::lsp_types::SemanticToken;

use super::legend::{TOKEN_CLASSES, TokenClass};
use crate::lexer::Token;

/// Helper for building delta-encoded semantic tokens.
///
/// Positions pushed here are zero-based and must arrive sorted by
/// `(line, start)`.
pub struct SemanticTokensBuilder {
    tokens: Vec<SemanticToken>,
    prev_line: u32,
    prev_start: u32,
}

impl SemanticTokensBuilder {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            prev_line: 0,
            prev_start: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Add a semantic token with absolute position
    ///
    /// The builder converts to delta encoding.
    pub fn push(&mut self, line: u32, start: u32, length: u32, token_type: u32) {
        // Out-of-order input clamps to zero instead of wrapping.
        let delta_line = line.saturating_sub(self.prev_line);
        let delta_start = if delta_line == 0 {
            start.saturating_sub(self.prev_start)
        } else {
            start
        };

        self.tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset: 0,
        });

        self.prev_line = line;
        self.prev_start = start;
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn build(self) -> Vec<SemanticToken> {
        self.tokens
    }
}

impl Default for SemanticTokensBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode tokens as LSP semantic tokens.
///
/// Tokens are stable-sorted by `(line, column)`; tokens with `line == 0` or
/// `length == 0` are dropped before delta computation, so they never affect
/// the deltas of their neighbours.
pub fn encode(tokens: &[Token]) -> Vec<SemanticToken> {
    let mut retained: Vec<&Token> = tokens.iter().filter(|t| t.line >= 1 && t.length > 0).collect();
    retained.sort_by_key(|t| t.position());

    let mut builder = SemanticTokensBuilder::with_capacity(retained.len());
    for token in retained {
        builder.push(token.line - 1, token.column, token.length, token.class.index());
    }
    builder.build()
}

/// Decode a packed stream back into absolute tokens with 1-based lines.
///
/// Token content is not recoverable and left empty. Type indices outside the
/// legend decode as `identifier`.
pub fn decode(data: &[SemanticToken]) -> Vec<Token> {
    let mut line = 0u32;
    let mut start = 0u32;
    data.iter()
        .map(|st| {
            if st.delta_line == 0 {
                start += st.delta_start;
            } else {
                line += st.delta_line;
                start = st.delta_start;
            }
            let class = TOKEN_CLASSES
                .get(st.token_type as usize)
                .copied()
                .unwrap_or(TokenClass::Identifier);
            Token::new(class, String::new(), line + 1, start, st.length)
        })
        .collect()
}

/// Flatten semantic tokens into the `uint32` quintuple layout sent on the wire.
pub fn flatten(data: &[SemanticToken]) -> Vec<u32> {
    data.iter()
        .flat_map(|st| {
            [
                st.delta_line,
                st.delta_start,
                st.length,
                st.token_type,
                st.token_modifiers_bitset,
            ]
        })
        .collect()
}
