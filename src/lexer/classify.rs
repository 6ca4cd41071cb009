//! Classification of raw lexemes into semantic token classes.
//!
//! Words are first looked up in the reserved-word tables. Remaining
//! identifiers are upgraded by a single forward pass that tracks statement
//! boundaries and a block scope stack:
//!
//! - the name after `gate` is a `gate`, and so is every later use of it;
//! - an identifier at the head of a statement followed by an operand (an
//!   identifier or hardware qubit), directly or after a parenthesised
//!   parameter list, is a gate call and classified `gate`;
//! - the name bound by a `qubit`/`bit`/`qreg`/`creg` statement stays
//!   `identifier` at its declaration and is a `register` wherever it is used
//!   while the declaring block is open.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use super::scanner::{RawKind, RawToken};
use super::token::Token;
use crate::semantic::legend::TokenClass;

const KEYWORDS: &[&str] = &[
    "OPENQASM", "include", "qubit", "bit", "int", "uint", "float", "angle", "complex", "bool",
    "let", "gate", "def", "return", "if", "else", "for", "while", "in", "break", "continue",
    "input", "output", "delay", "box", "qreg", "creg", "duration", "stretch", "void", "array",
    "switch", "case", "default", "cal", "defcal", "defcalgrammar", "pragma", "#pragma", "end",
    "ctrl", "negctrl", "inv",
];

const BUILTIN_GATES: &[&str] = &[
    "h", "x", "y", "z", "s", "sdg", "t", "tdg", "sx", "rx", "ry", "rz", "cx", "cy", "cz", "ch",
    "swap", "ccx", "cswap", "crx", "cry", "crz", "cu1", "cu3", "u1", "u2", "u3", "p", "cp", "id",
    "u", "U", "CX", "cu", "phase", "cphase", "gphase",
];

const BUILTIN_CLASSICAL: &[&str] = &[
    "sin", "cos", "tan", "exp", "ln", "sqrt", "rotl", "rotr", "popcount", "pow", "arcsin",
    "arccos", "arctan", "ceiling", "floor", "log", "mod", "real", "imag", "sizeof",
];

const BUILTIN_CONSTANTS: &[&str] = &["pi", "π", "tau", "τ", "euler", "ℇ", "true", "false"];

/// Reserved words and builtin names with a fixed classification.
static RESERVED: Lazy<FxHashMap<&'static str, TokenClass>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    let groups: [(&[&'static str], TokenClass); 4] = [
        (KEYWORDS, TokenClass::Keyword),
        (BUILTIN_GATES, TokenClass::BuiltinGate),
        (BUILTIN_CLASSICAL, TokenClass::BuiltinClassical),
        (BUILTIN_CONSTANTS, TokenClass::BuiltinConstant),
    ];
    for (words, class) in groups {
        for word in words {
            table.insert(*word, class);
        }
    }
    table.insert("measure", TokenClass::Measurement);
    table.insert("reset", TokenClass::BuiltinQuantum);
    table.insert("barrier", TokenClass::BuiltinQuantum);
    table.insert("const", TokenClass::AccessControl);
    table.insert("mutable", TokenClass::AccessControl);
    table.insert("readonly", TokenClass::AccessControl);
    table.insert("extern", TokenClass::Extern);
    table
});

/// Fixed classification of a word, if it is reserved.
pub fn reserved_class(word: &str) -> Option<TokenClass> {
    RESERVED.get(word).copied()
}

/// Keywords that declare a register-like name.
fn declares_register(word: &str) -> bool {
    matches!(word, "qubit" | "bit" | "qreg" | "creg")
}

/// Modifiers that may precede a declaration without ending the statement head.
fn is_declaration_prefix(word: &str) -> bool {
    matches!(word, "const" | "input" | "output" | "readonly" | "mutable")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paren {
    /// `(` opening the condition of `if`/`while`/`switch`; a statement follows it.
    Condition,
    Other,
}

struct Classifier<'a> {
    raw: &'a [RawToken<'a>],
    /// For each token, the index of the next non-comment token.
    next_significant: Vec<Option<usize>>,
    /// For each `(`, the index of its `)` within the same statement.
    matching_close: Vec<Option<usize>>,
    gates: FxHashSet<&'a str>,
    scopes: Vec<FxHashSet<&'a str>>,
    parens: Vec<Paren>,
    bracket_depth: u32,
    statement_start: bool,
    /// Set after a register-declaring keyword; holds the bracket depth at
    /// which the declared name is expected.
    pending_declaration: Option<u32>,
    expect_gate_name: bool,
    expect_condition: bool,
}

impl<'a> Classifier<'a> {
    fn new(raw: &'a [RawToken<'a>]) -> Self {
        Self {
            raw,
            next_significant: next_significant_table(raw),
            matching_close: matching_close_table(raw),
            gates: FxHashSet::default(),
            scopes: vec![FxHashSet::default()],
            parens: Vec::new(),
            bracket_depth: 0,
            statement_start: true,
            pending_declaration: None,
            expect_gate_name: false,
            expect_condition: false,
        }
    }

    fn run(mut self) -> Vec<Token> {
        let raw = self.raw;
        raw.iter()
            .enumerate()
            .map(|(i, token)| {
                let class = self.classify(i, token);
                Token::new(class, token.text, token.line, token.column, token.length)
            })
            .collect()
    }

    fn classify(&mut self, i: usize, token: &RawToken<'a>) -> TokenClass {
        match token.kind {
            RawKind::Comment => TokenClass::Comment,
            RawKind::String => {
                self.statement_start = false;
                TokenClass::String
            }
            // The line break that ended the string also ends the statement.
            RawKind::UnterminatedString => {
                self.statement_start = true;
                self.pending_declaration = None;
                TokenClass::String
            }
            RawKind::Number => {
                self.statement_start = false;
                TokenClass::Number
            }
            RawKind::HardwareQubit => {
                self.statement_start = false;
                TokenClass::HardwareQubit
            }
            RawKind::Operator => {
                self.operator(token.text);
                TokenClass::Operator
            }
            RawKind::Punctuation => {
                self.punctuation(token.text);
                TokenClass::Punctuation
            }
            RawKind::Word => self.word(i, token.text),
        }
    }

    fn operator(&mut self, text: &str) {
        if text == "=" {
            self.pending_declaration = None;
        }
        // `ctrl @ name ...`: a gate modifier hands the head position to the next word.
        // At the very start of a statement `@` opens an annotation instead.
        self.statement_start = text == "@" && !self.statement_start;
    }

    fn punctuation(&mut self, text: &str) {
        match text {
            ";" => {
                self.statement_start = true;
                self.pending_declaration = None;
            }
            "{" => {
                self.scopes.push(FxHashSet::default());
                self.statement_start = true;
                self.pending_declaration = None;
            }
            "}" => {
                if self.scopes.len() > 1 {
                    self.scopes.pop();
                }
                self.statement_start = true;
            }
            "(" => {
                let kind = if self.expect_condition { Paren::Condition } else { Paren::Other };
                self.parens.push(kind);
                self.expect_condition = false;
                self.statement_start = false;
            }
            ")" => {
                self.statement_start = self.parens.pop() == Some(Paren::Condition);
            }
            "[" => {
                self.bracket_depth += 1;
                self.statement_start = false;
            }
            "]" => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                self.statement_start = false;
            }
            _ => self.statement_start = false,
        }
    }

    fn word(&mut self, i: usize, text: &'a str) -> TokenClass {
        let gate_name = std::mem::take(&mut self.expect_gate_name);

        if let Some(class) = reserved_class(text) {
            match text {
                "gate" => self.expect_gate_name = true,
                "if" | "while" | "switch" => self.expect_condition = true,
                _ => {}
            }
            if declares_register(text) && self.statement_start {
                self.pending_declaration = Some(self.bracket_depth);
            }
            self.statement_start = match text {
                "else" => true,
                word if is_declaration_prefix(word) => self.statement_start,
                _ => false,
            };
            return class;
        }

        let at_head = std::mem::replace(&mut self.statement_start, false);

        if gate_name {
            self.gates.insert(text);
            return TokenClass::Gate;
        }
        if self.pending_declaration == Some(self.bracket_depth) {
            self.pending_declaration = None;
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert(text);
            }
            return TokenClass::Identifier;
        }
        if self.gates.contains(text) || (at_head && self.is_gate_call(i)) {
            return TokenClass::Gate;
        }
        if self.scopes.iter().any(|scope| scope.contains(text)) {
            return TokenClass::Register;
        }
        TokenClass::Identifier
    }

    fn is_operand(&self, j: usize) -> bool {
        let token = &self.raw[j];
        match token.kind {
            RawKind::HardwareQubit => true,
            RawKind::Word => reserved_class(token.text) != Some(TokenClass::Keyword),
            _ => false,
        }
    }

    /// Whether the identifier at `i` heads a gate call: `name q;`,
    /// `name(params) q;`.
    fn is_gate_call(&self, i: usize) -> bool {
        let Some(next) = self.next_significant[i] else {
            return false;
        };
        if self.is_operand(next) {
            return true;
        }
        self.matching_close[next]
            .and_then(|close| self.next_significant[close])
            .is_some_and(|after| self.is_operand(after))
    }
}

fn next_significant_table(raw: &[RawToken<'_>]) -> Vec<Option<usize>> {
    let mut table = vec![None; raw.len()];
    let mut next = None;
    for (i, token) in raw.iter().enumerate().rev() {
        table[i] = next;
        if token.kind != RawKind::Comment {
            next = Some(i);
        }
    }
    table
}

/// Parentheses never pair across `;`, `{` or `}`.
fn matching_close_table(raw: &[RawToken<'_>]) -> Vec<Option<usize>> {
    let mut table = vec![None; raw.len()];
    let mut open = Vec::new();
    for (i, token) in raw.iter().enumerate() {
        if token.kind != RawKind::Punctuation {
            continue;
        }
        match token.text {
            "(" => open.push(i),
            ")" => {
                if let Some(start) = open.pop() {
                    table[start] = Some(i);
                }
            }
            ";" | "{" | "}" => open.clear(),
            _ => {}
        }
    }
    table
}

/// Classify scanned lexemes in source order.
pub(crate) fn classify(raw: &[RawToken<'_>]) -> Vec<Token> {
    Classifier::new(raw).run()
}
