//! OpenQASM 3.0 tokenizer
//!
//! Turns source text into classified, positioned [`Token`]s. Scanning and
//! classification are separate passes: [`scanner`] cuts the text into lexemes
//! and [`classify`] assigns each one a [`TokenClass`](crate::semantic::legend::TokenClass).
//!
//! Positions follow the LSP convention: lines are reported 1-based here and
//! converted by the encoder, columns and lengths are UTF-16 code units, and no
//! token crosses a line break (block comments are emitted per line).

pub mod classify;
pub mod cursor;
mod error;
pub(crate) mod scanner;
mod token;

pub use classify::reserved_class;
pub use error::TokenizeError;
pub use token::{LexDiagnostic, LexDiagnosticKind, Token, Tokenized};

use tracing::debug;

/// Upper bounds past which tokenization refuses a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerLimits {
    pub max_input_bytes: usize,
    pub max_tokens: usize,
}

impl Default for TokenizerLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: 32 * 1024 * 1024,
            max_tokens: 4 * 1024 * 1024,
        }
    }
}

/// Tokenize `source` with the default limits.
pub fn tokenize(source: &str) -> Result<Tokenized, TokenizeError> {
    tokenize_with_limits(source, &TokenizerLimits::default())
}

/// Tokenize `source`, failing only when a limit in `limits` is exceeded.
///
/// Tokens come back in source order. Malformed lexemes are either emitted
/// with their best-fit class or skipped, and reported in
/// [`Tokenized::diagnostics`].
pub fn tokenize_with_limits(source: &str, limits: &TokenizerLimits) -> Result<Tokenized, TokenizeError> {
    if source.len() > limits.max_input_bytes {
        return Err(TokenizeError::InputTooLarge {
            len: source.len(),
            limit: limits.max_input_bytes,
        });
    }

    let (raw, diagnostics) = scanner::Scanner::new(source, limits.max_tokens).scan()?;
    let tokens = classify::classify(&raw);

    for diagnostic in &diagnostics {
        debug!("Lexer diagnostic: {}", diagnostic);
    }

    Ok(Tokenized { tokens, diagnostics })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::semantic::legend::TokenClass;

    fn summary(source: &str) -> Vec<(TokenClass, String, u32, u32, u32)> {
        tokenize(source)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.class, t.content, t.line, t.column, t.length))
            .collect()
    }

    #[test]
    fn test_empty_source() {
        let result = tokenize("").unwrap();
        assert!(result.tokens.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_minimal_program() {
        assert_eq!(
            summary("OPENQASM 3.0;\nqubit q;\n"),
            vec![
                (TokenClass::Keyword, "OPENQASM".into(), 1, 0, 8),
                (TokenClass::Number, "3.0".into(), 1, 9, 3),
                (TokenClass::Punctuation, ";".into(), 1, 12, 1),
                (TokenClass::Keyword, "qubit".into(), 2, 0, 5),
                (TokenClass::Identifier, "q".into(), 2, 6, 1),
                (TokenClass::Punctuation, ";".into(), 2, 7, 1),
            ]
        );
    }

    #[test]
    fn test_comment_and_hardware_qubit() {
        let classes: Vec<TokenClass> = summary("// hi\nrx(pi) $0;").into_iter().map(|t| t.0).collect();
        assert_eq!(
            classes,
            vec![
                TokenClass::Comment,
                TokenClass::BuiltinGate,
                TokenClass::Punctuation,
                TokenClass::BuiltinConstant,
                TokenClass::Punctuation,
                TokenClass::HardwareQubit,
                TokenClass::Punctuation,
            ]
        );
    }

    #[test]
    fn test_full_program_classes() {
        let source = indoc! {r#"
            OPENQASM 3.0;
            include "stdgates.inc";
            extern get_angle(int) -> angle;
            const float theta = τ / 4;
            qubit[2] q;
            bit[2] c;
            h q[0];
            cx q[0], q[1];
            barrier q;
            c = measure q;
        "#};
        let tokens = summary(source);
        let find = |text: &str| tokens.iter().find(|t| t.1 == text).map(|t| t.0);
        assert_eq!(find("include"), Some(TokenClass::Keyword));
        assert_eq!(find("\"stdgates.inc\""), Some(TokenClass::String));
        assert_eq!(find("extern"), Some(TokenClass::Extern));
        assert_eq!(find("->"), Some(TokenClass::Operator));
        assert_eq!(find("const"), Some(TokenClass::AccessControl));
        assert_eq!(find("τ"), Some(TokenClass::BuiltinConstant));
        assert_eq!(find("cx"), Some(TokenClass::BuiltinGate));
        assert_eq!(find("barrier"), Some(TokenClass::BuiltinQuantum));
        assert_eq!(find("measure"), Some(TokenClass::Measurement));
        assert_eq!(find(","), Some(TokenClass::Punctuation));
    }

    #[test]
    fn test_no_two_tokens_share_a_position() {
        let source = "/* a\n b */ gate g(t) a { U(t, 0, π) a; }\r\ng(1.5) $3;\rq";
        let tokens = tokenize(source).unwrap().tokens;
        let mut positions: Vec<(u32, u32)> = tokens.iter().map(Token::position).collect();
        let before = positions.len();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), before);
        assert!(tokens.iter().all(|t| t.line >= 1 && t.length > 0));
        assert_eq!(tokens.last().map(|t| t.line), Some(4));
    }

    #[test]
    fn test_input_limit_is_terminal() {
        let limits = TokenizerLimits {
            max_input_bytes: 4,
            ..TokenizerLimits::default()
        };
        assert_eq!(
            tokenize_with_limits("qubit q;", &limits).unwrap_err(),
            TokenizeError::InputTooLarge { len: 8, limit: 4 }
        );
    }

    #[test]
    fn test_token_limit_is_terminal() {
        let limits = TokenizerLimits {
            max_tokens: 2,
            ..TokenizerLimits::default()
        };
        assert!(matches!(
            tokenize_with_limits("qubit q;", &limits),
            Err(TokenizeError::TooManyTokens { limit: 2 })
        ));
    }

    #[test]
    fn test_malformed_lexemes_do_not_abort() {
        let result = tokenize("qubit q; ? \"open").unwrap();
        assert_eq!(result.tokens.len(), 4);
        assert_eq!(result.tokens[3].class, TokenClass::String);
        assert_eq!(result.diagnostics.len(), 2);
    }
}
