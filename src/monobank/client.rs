use crate::config::MonobankConfig;
use crate::error::Error;
use crate::monobank::types::{ClientInfo, StatementItem, StatementQuery};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

pub const TOKEN_HEADER: &str = "X-Token";
pub const CLIENT_INFO_PATH: &str = "/personal/client-info";

/// Read-only access to the Monobank personal API.
///
/// Every call performs exactly one upstream request; nothing is cached or retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonobankApi: Send + Sync {
    async fn client_info(&self) -> Result<ClientInfo, Error>;

    async fn statement(&self, query: StatementQuery) -> Result<Vec<StatementItem>, Error>;
}

pub struct MonobankClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl MonobankClient {
    pub fn new(config: MonobankConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(concat!("monobank-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%path, "Sending request to Monobank API");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.expose_secret())
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::warn!(%path, status = status.as_u16(), "Monobank API returned an error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MonobankApi for MonobankClient {
    async fn client_info(&self) -> Result<ClientInfo, Error> {
        self.get(CLIENT_INFO_PATH).await
    }

    async fn statement(&self, query: StatementQuery) -> Result<Vec<StatementItem>, Error> {
        let items: Vec<StatementItem> = self.get(&query.path()).await?;
        tracing::debug!(
            account_id = %query.account_id,
            count = items.len(),
            "Received statement"
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_URL;

    #[test]
    fn new_trims_trailing_slash() {
        let client =
            MonobankClient::new(MonobankConfig::new("token", "http://localhost:1234/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn new_keeps_default_base_url() {
        let client = MonobankClient::new(MonobankConfig::new("token", DEFAULT_BASE_URL)).unwrap();
        assert_eq!(client.base_url(), "https://api.monobank.ua");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let client =
            MonobankClient::new(MonobankConfig::new("token", "http://127.0.0.1:9")).unwrap();

        let result = client.client_info().await;

        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
