//! Semantic token legend
//!
//! The legend is the ordered list of token type names advertised to the client
//! during `initialize`. Every `tokenType` in a packed semantic-tokens response is
//! an index into this list, so the order below is a wire contract for the whole
//! session and must never be rearranged.

use std::fmt;

use serde::{Serialize, Serializer};
use tower_lsp::lsp_types::{SemanticTokenType, SemanticTokensLegend};

/// Classification assigned to every token the lexer produces.
///
/// The discriminant of each variant is its legend index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenClass {
    Keyword = 0,
    Operator = 1,
    Identifier = 2,
    Number = 3,
    String = 4,
    Comment = 5,
    Gate = 6,
    Measurement = 7,
    Register = 8,
    Punctuation = 9,
    BuiltinGate = 10,
    BuiltinQuantum = 11,
    BuiltinClassical = 12,
    BuiltinConstant = 13,
    AccessControl = 14,
    Extern = 15,
    HardwareQubit = 16,
}

/// All classifications in legend order.
pub const TOKEN_CLASSES: [TokenClass; 17] = [
    TokenClass::Keyword,
    TokenClass::Operator,
    TokenClass::Identifier,
    TokenClass::Number,
    TokenClass::String,
    TokenClass::Comment,
    TokenClass::Gate,
    TokenClass::Measurement,
    TokenClass::Register,
    TokenClass::Punctuation,
    TokenClass::BuiltinGate,
    TokenClass::BuiltinQuantum,
    TokenClass::BuiltinClassical,
    TokenClass::BuiltinConstant,
    TokenClass::AccessControl,
    TokenClass::Extern,
    TokenClass::HardwareQubit,
];

impl TokenClass {
    /// Wire name of the classification, as listed in the legend.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Operator => "operator",
            TokenClass::Identifier => "identifier",
            TokenClass::Number => "number",
            TokenClass::String => "string",
            TokenClass::Comment => "comment",
            TokenClass::Gate => "gate",
            TokenClass::Measurement => "measurement",
            TokenClass::Register => "register",
            TokenClass::Punctuation => "punctuation",
            TokenClass::BuiltinGate => "builtin_gate",
            TokenClass::BuiltinQuantum => "builtin_quantum",
            TokenClass::BuiltinClassical => "builtin_classical",
            TokenClass::BuiltinConstant => "builtin_constant",
            TokenClass::AccessControl => "access_control",
            TokenClass::Extern => "extern",
            TokenClass::HardwareQubit => "hardware_qubit",
        }
    }

    /// Looks up a classification by wire name.
    ///
    /// Unknown names fall back to [`TokenClass::Identifier`]; an unrecognised
    /// classification must never fail a request.
    pub fn from_name(name: &str) -> Self {
        TOKEN_CLASSES
            .iter()
            .copied()
            .find(|class| class.as_str() == name)
            .unwrap_or(TokenClass::Identifier)
    }

    /// Legend index of this classification.
    pub const fn index(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TokenClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Legend names in index order.
pub fn names() -> Vec<&'static str> {
    TOKEN_CLASSES.iter().map(|class| class.as_str()).collect()
}

/// Index of `name` in the legend, or the index of `identifier` when `name` is
/// not a known classification.
pub fn index_of(name: &str) -> u32 {
    TokenClass::from_name(name).index()
}

/// Legend advertised in the server capabilities. No modifiers are defined.
pub fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_CLASSES
            .iter()
            .map(|class| SemanticTokenType::new(class.as_str()))
            .collect(),
        token_modifiers: Vec::new(),
    }
}
