mod handlers;
mod state;

pub use handlers::SERVER_NAME;
pub use state::QasmBackend;
