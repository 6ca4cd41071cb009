pub mod backend;
pub mod document_store;

pub use backend::QasmBackend;
pub use document_store::DocumentStore;
