use monobank_mcp::Config;
use monobank_mcp::logging::{self, redact_token};
use monobank_mcp::mcp::McpServer;
use monobank_mcp::monobank::MonobankClient;
use secrecy::ExposeSecret;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.monobank.base_url,
        token = %redact_token(config.monobank.token.expose_secret()),
        "Starting Monobank MCP server"
    );

    if config.monobank.uses_placeholder_token() {
        tracing::warn!(
            "MONOBANK_API_TOKEN is not set; requests will be rejected by the Monobank API"
        );
    }

    let client = MonobankClient::new(config.monobank)?;
    let server = McpServer::new(Arc::new(client));

    if let Err(e) = server.run_stdio().await {
        tracing::error!(error = %e, "MCP server terminated with an error");
        return Err(e);
    }

    tracing::info!("MCP server stopped");
    Ok(())
}
