/// Character iterator over OpenQASM source with LSP-style position tracking.
///
/// Besides the byte offset, the cursor tracks the 1-based line and the 0-based
/// column measured in UTF-16 code units. LF, CRLF and a lone CR each end a
/// line; in a CRLF pair the line advances at the LF.
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    chars: std::str::Chars<'src>,
}

/// Saved cursor position, used as the start of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub pos: usize,
    pub line: u32,
    pub column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            chars: source.chars(),
        }
    }

    /// Look at the current character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// Look at the character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next()
    }

    /// Look `n` characters ahead; `peek_nth(0)` is `peek()`.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    /// Consume the current character, updating line and column.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => self.new_line(),
            '\r' if self.peek() != Some('\n') => self.new_line(),
            _ => self.column += c.len_utf16() as u32,
        }
        Some(c)
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if predicate(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Unconsumed remainder of the source.
    pub fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Source text between a mark and the current position.
    pub fn text_since(&self, mark: Mark) -> &'src str {
        &self.source[mark.pos..self.pos]
    }
}
