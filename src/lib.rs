pub mod config;
pub mod lexer;
pub mod logging;
pub mod lsp;
pub mod semantic;

pub use config::ServerConfig;
pub use lsp::QasmBackend;
