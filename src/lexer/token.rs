use std::fmt;

use serde::Serialize;

use crate::semantic::legend::TokenClass;

/// A classified token with its position in the source.
///
/// `line` is 1-based; `column` and `length` are counted in UTF-16 code units,
/// matching LSP positions. A token never spans a line boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type_name")]
    pub class: TokenClass,
    /// Lexeme text, kept for debugging output only.
    pub content: String,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

impl Token {
    pub fn new(class: TokenClass, content: impl Into<String>, line: u32, column: u32, length: u32) -> Self {
        Token {
            class,
            content: content.into(),
            line,
            column,
            length,
        }
    }

    /// Builds a token from a classification name; unknown names become
    /// `identifier`.
    pub fn with_class_name(name: &str, content: impl Into<String>, line: u32, column: u32, length: u32) -> Self {
        Self::new(TokenClass::from_name(name), content, line, column, length)
    }

    /// Sort key used by the encoder.
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }
}

/// Recoverable problems found while lexing. Never fatal for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexDiagnosticKind {
    UnterminatedString,
    UnterminatedBlockComment,
    UnexpectedCharacter(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexDiagnostic {
    pub kind: LexDiagnosticKind,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexDiagnosticKind::UnterminatedString => {
                write!(f, "unterminated string literal at {}:{}", self.line, self.column)
            }
            LexDiagnosticKind::UnterminatedBlockComment => {
                write!(f, "unterminated block comment at {}:{}", self.line, self.column)
            }
            LexDiagnosticKind::UnexpectedCharacter(c) => {
                write!(f, "unexpected character {:?} at {}:{}", c, self.line, self.column)
            }
        }
    }
}

/// Output of a successful tokenization.
#[derive(Debug, Clone, Default)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexDiagnostic>,
}
