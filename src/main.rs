//! OpenQASM 3.0 language server.
//!
//! Speaks LSP over stdin/stdout and serves semantic tokens for `.qasm`
//! documents. Logs go to stderr, and optionally to a session file in the
//! user's cache directory (`--log-file`).

use anyhow::Context;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;

use qasm_language_server::QasmBackend;
use qasm_language_server::config::ServerConfig;
use qasm_language_server::logging::init_logger;

#[derive(Parser, Debug)]
#[command(name = "qasm-language-server", version, about = "OpenQASM 3.0 language server")]
struct Args {
    /// Communicate over stdin/stdout (the only transport; accepted for editor compatibility)
    #[arg(long)]
    stdio: bool,

    /// Log filter for stderr, e.g. "debug" or "qasm_language_server=trace" (overrides RUST_LOG)
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Disable colorized log output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Also write a debug-level session log to the user cache directory
    #[arg(long = "log-file")]
    log_file: bool,

    /// Refuse to tokenize documents larger than this many bytes
    #[arg(long = "max-document-bytes")]
    max_document_bytes: Option<usize>,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        let config = ServerConfig::default();
        match self.max_document_bytes {
            Some(bytes) => config.with_max_document_bytes(bytes),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _guard = init_logger(args.no_color, args.log_level.as_deref(), args.log_file)
        .context("failed to initialize logging")?;

    let config = args.server_config();
    info!(
        "Starting qasm-language-server {} (stdio={}, max document bytes={})",
        env!("CARGO_PKG_VERSION"),
        args.stdio,
        config.limits.max_input_bytes
    );

    let (service, socket) = LspService::build(|client| QasmBackend::with_config(client, config))
        .custom_method("$/setTrace", QasmBackend::set_trace)
        .finish();

    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::parse_from(["qasm-language-server"]);
        assert!(!args.stdio);
        assert_eq!(args.server_config(), ServerConfig::default());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "qasm-language-server",
            "--stdio",
            "--log-level",
            "debug",
            "--no-color",
            "--max-document-bytes",
            "1024",
        ]);
        assert!(args.stdio && args.no_color && !args.log_file);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.server_config().limits.max_input_bytes, 1024);
    }
}
