//! Semantic token legend and packed encoding.

pub mod encoder;
pub mod legend;

pub use encoder::{SemanticTokensBuilder, decode, encode, flatten};
pub use legend::{TokenClass, index_of, names, semantic_tokens_legend};
