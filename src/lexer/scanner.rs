//! Lexical scan of OpenQASM source into positioned raw lexemes.
//!
//! The scanner only decides token boundaries and the lexical category of each
//! lexeme (comment, string, number, word, operator, ...). Mapping words to
//! keywords, builtins, gates and registers happens afterwards in
//! [`classify`](super::classify), which needs to look at neighbouring tokens.

use super::cursor::{Cursor, Mark};
use super::error::TokenizeError;
use super::token::{LexDiagnostic, LexDiagnosticKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    Comment,
    String,
    /// String cut short by the end of its line.
    UnterminatedString,
    Number,
    /// Identifier-shaped lexeme, including keywords and `#pragma`.
    Word,
    HardwareQubit,
    Operator,
    Punctuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawToken<'src> {
    pub kind: RawKind,
    pub text: &'src str,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

/// Operators ordered longest first so the first prefix match is the longest.
const OPERATORS: &[&str] = &[
    "**=", "<<=", ">>=", "**", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "->", "=>", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "~=", "+", "-", "*", "/", "%", "=", "<", ">", "!",
    "&", "|", "^", "~", "@",
];

const PUNCTUATION: &[char] = &['(', ')', '[', ']', '{', '}', ';', ',', ':', '.'];

/// Suffixes that may directly follow a numeric literal: imaginary and timing units.
const NUMBER_SUFFIXES: &[&str] = &["im", "dt", "ns", "us", "µs", "ms", "s"];

pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub(crate) struct Scanner<'src> {
    cursor: Cursor<'src>,
    tokens: Vec<RawToken<'src>>,
    diagnostics: Vec<LexDiagnostic>,
    max_tokens: usize,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(source: &'src str, max_tokens: usize) -> Self {
        Self {
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            max_tokens,
        }
    }

    pub(crate) fn scan(mut self) -> Result<(Vec<RawToken<'src>>, Vec<LexDiagnostic>), TokenizeError> {
        while let Some(c) = self.cursor.peek() {
            let start = self.cursor.mark();
            match c {
                c if c.is_whitespace() => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_next() == Some('/') => self.line_comment(start),
                '/' if self.cursor.peek_next() == Some('*') => self.block_comment(start),
                '"' => self.string(start),
                '0'..='9' => self.number(start),
                '.' if self.cursor.peek_next().is_some_and(|n| n.is_ascii_digit()) => self.number(start),
                '$' if self.cursor.peek_next().is_some_and(|n| n.is_ascii_digit()) => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_ascii_digit());
                    self.emit(RawKind::HardwareQubit, start);
                }
                '#' if self.cursor.peek_next().is_some_and(is_ident_start) => {
                    self.cursor.advance();
                    self.cursor.eat_while(is_ident_continue);
                    self.emit(RawKind::Word, start);
                }
                c if is_ident_start(c) => {
                    self.cursor.eat_while(is_ident_continue);
                    self.emit(RawKind::Word, start);
                }
                _ => self.symbol(start, c),
            }

            if self.tokens.len() > self.max_tokens {
                return Err(TokenizeError::TooManyTokens { limit: self.max_tokens });
            }
        }

        Ok((self.tokens, self.diagnostics))
    }

    /// Push a token spanning `start` to the current position. Empty spans are
    /// dropped.
    fn emit(&mut self, kind: RawKind, start: Mark) {
        let length = self.cursor.column() - start.column;
        if length == 0 {
            return;
        }
        self.tokens.push(RawToken {
            kind,
            text: self.cursor.text_since(start),
            line: start.line,
            column: start.column,
            length,
        });
    }

    fn diagnose(&mut self, kind: LexDiagnosticKind, at: Mark) {
        self.diagnostics.push(LexDiagnostic {
            kind,
            line: at.line,
            column: at.column,
        });
    }

    fn line_comment(&mut self, start: Mark) {
        self.cursor.eat_while(|c| !is_line_break(c));
        self.emit(RawKind::Comment, start);
    }

    /// `/* ... */`, emitted as one comment fragment per line.
    fn block_comment(&mut self, start: Mark) {
        self.cursor.advance();
        self.cursor.advance();
        let mut fragment = start;

        loop {
            match self.cursor.peek() {
                None => {
                    self.emit(RawKind::Comment, fragment);
                    self.diagnose(LexDiagnosticKind::UnterminatedBlockComment, start);
                    return;
                }
                Some('*') if self.cursor.peek_next() == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.emit(RawKind::Comment, fragment);
                    return;
                }
                Some(c) if is_line_break(c) => {
                    self.emit(RawKind::Comment, fragment);
                    self.cursor.advance();
                    if c == '\r' && self.cursor.peek() == Some('\n') {
                        self.cursor.advance();
                    }
                    fragment = self.cursor.mark();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Double-quoted string. An unterminated string runs to the end of its line.
    fn string(&mut self, start: Mark) {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None => break,
                Some(c) if is_line_break(c) => break,
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some_and(|c| !is_line_break(c)) {
                        self.cursor.advance();
                    }
                }
                Some('"') => {
                    self.cursor.advance();
                    self.emit(RawKind::String, start);
                    return;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        self.emit(RawKind::UnterminatedString, start);
        self.diagnose(LexDiagnosticKind::UnterminatedString, start);
    }

    fn number(&mut self, start: Mark) {
        let radix = match (self.cursor.peek(), self.cursor.peek_next()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        }
        .filter(|&radix| self.cursor.peek_nth(2).is_some_and(|c| c.is_digit(radix)));

        if let Some(radix) = radix {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_digit(radix) || c == '_');
        } else {
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            if self.cursor.peek() == Some('.') && self.fraction_follows() {
                self.cursor.advance();
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            }
            self.exponent();
        }

        self.suffix();
        self.emit(RawKind::Number, start);
    }

    /// Whether the `.` at the cursor belongs to the numeric literal (`1.5`,
    /// `1.`, `1.e3`) rather than starting a member access.
    fn fraction_follows(&self) -> bool {
        match self.cursor.peek_next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('e' | 'E') => true,
            Some(c) => !is_ident_start(c) && c != '.',
            None => true,
        }
    }

    fn exponent(&mut self) {
        if !matches!(self.cursor.peek(), Some('e' | 'E')) {
            return;
        }
        let digits_at = match self.cursor.peek_next() {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if self.cursor.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
            for _ in 0..digits_at {
                self.cursor.advance();
            }
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
    }

    fn suffix(&mut self) {
        let rest = self.cursor.rest();
        let word_len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(rest.len(), |(i, _)| i);
        let word = &rest[..word_len];
        if NUMBER_SUFFIXES.contains(&word) {
            for _ in word.chars() {
                self.cursor.advance();
            }
        }
    }

    fn symbol(&mut self, start: Mark, c: char) {
        let rest = self.cursor.rest();
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            for _ in 0..op.len() {
                self.cursor.advance();
            }
            self.emit(RawKind::Operator, start);
        } else if PUNCTUATION.contains(&c) {
            self.cursor.advance();
            self.emit(RawKind::Punctuation, start);
        } else {
            self.cursor.advance();
            self.diagnose(LexDiagnosticKind::UnexpectedCharacter(c), start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<(RawKind, &str, u32, u32, u32)> {
        let (tokens, _) = Scanner::new(source, usize::MAX).scan().unwrap();
        tokens
            .into_iter()
            .map(|t| (t.kind, t.text, t.line, t.column, t.length))
            .collect()
    }

    fn kinds(source: &str) -> Vec<(RawKind, &str)> {
        scan(source).into_iter().map(|(kind, text, ..)| (kind, text)).collect()
    }

    #[test]
    fn test_version_header() {
        assert_eq!(
            scan("OPENQASM 3.0;"),
            vec![
                (RawKind::Word, "OPENQASM", 1, 0, 8),
                (RawKind::Number, "3.0", 1, 9, 3),
                (RawKind::Punctuation, ";", 1, 12, 1),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("a == b = c ** 2 **= 3 <<= 1 -> d"),
            vec![
                (RawKind::Word, "a"),
                (RawKind::Operator, "=="),
                (RawKind::Word, "b"),
                (RawKind::Operator, "="),
                (RawKind::Word, "c"),
                (RawKind::Operator, "**"),
                (RawKind::Number, "2"),
                (RawKind::Operator, "**="),
                (RawKind::Number, "3"),
                (RawKind::Operator, "<<="),
                (RawKind::Number, "1"),
                (RawKind::Operator, "->"),
                (RawKind::Word, "d"),
            ]
        );
    }

    #[test]
    fn test_numeric_literals() {
        let numbers: Vec<&str> = kinds("42 1_000 3.14 .5 1e-3 2.5E10 0x1F 0b1010 0o17 1. 100ns 2.5us 1.5im 10dt")
            .into_iter()
            .map(|(kind, text)| {
                assert_eq!(kind, RawKind::Number, "{} should be a number", text);
                text
            })
            .collect();
        assert_eq!(
            numbers,
            vec!["42", "1_000", "3.14", ".5", "1e-3", "2.5E10", "0x1F", "0b1010", "0o17", "1.", "100ns", "2.5us", "1.5im", "10dt"]
        );
    }

    #[test]
    fn test_radix_literals_only_take_their_digits() {
        assert_eq!(
            kinds("0o9 0bF 0b1_01 0o17 0xfF"),
            vec![
                (RawKind::Number, "0"),
                (RawKind::Word, "o9"),
                (RawKind::Number, "0"),
                (RawKind::Word, "bF"),
                (RawKind::Number, "0b1_01"),
                (RawKind::Number, "0o17"),
                (RawKind::Number, "0xfF"),
            ]
        );
        assert_eq!(kinds("0b102"), vec![(RawKind::Number, "0b10"), (RawKind::Number, "2")]);
    }

    #[test]
    fn test_number_followed_by_identifier() {
        assert_eq!(kinds("3x"), vec![(RawKind::Number, "3"), (RawKind::Word, "x")]);
    }

    #[test]
    fn test_line_comment_stops_at_line_end() {
        assert_eq!(
            scan("x; // note\ny"),
            vec![
                (RawKind::Word, "x", 1, 0, 1),
                (RawKind::Punctuation, ";", 1, 1, 1),
                (RawKind::Comment, "// note", 1, 3, 7),
                (RawKind::Word, "y", 2, 0, 1),
            ]
        );
    }

    #[test]
    fn test_block_comment_is_split_per_line() {
        assert_eq!(
            scan("/* a\n\n  b */ x"),
            vec![
                (RawKind::Comment, "/* a", 1, 0, 4),
                (RawKind::Comment, "  b */", 3, 0, 6),
                (RawKind::Word, "x", 3, 7, 1),
            ]
        );
    }

    #[test]
    fn test_block_comment_with_crlf() {
        assert_eq!(
            scan("/* a\r\nb */"),
            vec![(RawKind::Comment, "/* a", 1, 0, 4), (RawKind::Comment, "b */", 2, 0, 4)]
        );
    }

    #[test]
    fn test_unterminated_block_comment_reports_diagnostic() {
        let (tokens, diagnostics) = Scanner::new("/* open\nstill", usize::MAX).scan().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, LexDiagnosticKind::UnterminatedBlockComment);
    }

    #[test]
    fn test_string_with_escape() {
        assert_eq!(scan(r#"include "a\"b.inc";"#)[1], (RawKind::String, r#""a\"b.inc""#, 1, 8, 10));
    }

    #[test]
    fn test_unterminated_string_runs_to_line_end() {
        let (tokens, diagnostics) = Scanner::new("\"abc\nx", usize::MAX).scan().unwrap();
        assert_eq!(tokens[0].kind, RawKind::UnterminatedString);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[0].length, 4);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(diagnostics[0].kind, LexDiagnosticKind::UnterminatedString);
    }

    #[test]
    fn test_hardware_qubit_and_pragma() {
        assert_eq!(
            kinds("#pragma x $12"),
            vec![
                (RawKind::Word, "#pragma"),
                (RawKind::Word, "x"),
                (RawKind::HardwareQubit, "$12"),
            ]
        );
    }

    #[test]
    fn test_unexpected_character_is_skipped() {
        let (tokens, diagnostics) = Scanner::new("a ? b", usize::MAX).scan().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(diagnostics[0].kind, LexDiagnosticKind::UnexpectedCharacter('?'));
        assert_eq!(diagnostics[0].column, 2);
    }

    #[test]
    fn test_unicode_identifiers_measure_utf16() {
        assert_eq!(
            scan("θ𝜃 = π;"),
            vec![
                (RawKind::Word, "θ𝜃", 1, 0, 3),
                (RawKind::Operator, "=", 1, 4, 1),
                (RawKind::Word, "π", 1, 6, 1),
                (RawKind::Punctuation, ";", 1, 7, 1),
            ]
        );
    }

    #[test]
    fn test_token_limit() {
        let err = Scanner::new("a b c d", 3).scan().unwrap_err();
        assert_eq!(err, TokenizeError::TooManyTokens { limit: 3 });
    }
}
