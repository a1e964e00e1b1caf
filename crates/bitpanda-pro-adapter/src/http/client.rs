/*
[INPUT]:  HTTP configuration (base URL, timeouts, credentials)
[OUTPUT]: Configured reqwest clients ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::http::{Error, Result};
use crate::types::Scope;

/// Base URL for the Bitpanda Pro public API
const BASE_URL: &str = "https://api.exchange.bitpanda.com/public/v1";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// API key and the scope it was created with
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub scope: Scope,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, scope: Scope) -> Self {
        Self {
            api_key: api_key.into(),
            scope,
        }
    }
}

/// Client for the public (unauthenticated) endpoints
#[derive(Debug, Clone)]
pub struct BitpandaClient {
    http_client: Client,
    base_url: Url,
}

impl BitpandaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, BASE_URL)
    }

    /// Create a new client against a custom base URL (used by tests)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Build a full URL for an endpoint path.
    ///
    /// The base URL carries the `/public/v1` prefix, so paths are appended
    /// rather than joined root-relative.
    fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build a request builder with the JSON headers every call carries
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "building exchange request");
        Ok(self
            .http_client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json"))
    }

    /// Send a request and decode the JSON body, mapping non-2xx responses
    /// to [`Error::Api`] with the raw body preserved
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %body, "exchange rejected request");
            return Err(Error::api_error(status, body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Client for the authenticated `/account` endpoints. Owns the credentials;
/// holds no other state, so instances can be used concurrently.
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: BitpandaClient,
    credentials: Credentials,
}

impl AccountClient {
    /// Create an account client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self {
            client: BitpandaClient::new()?,
            credentials,
        })
    }

    /// Wrap an existing public client with credentials
    pub fn with_client(client: BitpandaClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// The scope the API key was created with
    pub fn scope(&self) -> Scope {
        self.credentials.scope
    }

    /// Access the wrapped public client
    pub fn public(&self) -> &BitpandaClient {
        &self.client
    }

    /// Build an authenticated request against the `/account` sub-root.
    ///
    /// `required_scope` is what the exchange will demand; the key's actual
    /// scope is only known server-side, so a mismatch here is logged rather
    /// than rejected.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        required_scope: Scope,
    ) -> Result<RequestBuilder> {
        if self.credentials.scope < required_scope {
            tracing::debug!(
                key_scope = ?self.credentials.scope,
                ?required_scope,
                "api key scope is below what this endpoint requires"
            );
        }
        let builder = self
            .client
            .request(method, &format!("/account{path}"))?
            .bearer_auth(&self.credentials.api_key);
        Ok(builder)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.client.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_timeouts() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let client = BitpandaClient::new().expect("client init");
        let url = client.url("/currencies").expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.exchange.bitpanda.com/public/v1/currencies"
        );
    }

    #[test]
    fn account_client_reports_scope() {
        let client = AccountClient::new(Credentials::new("key", Scope::Trade)).expect("client");
        assert_eq!(client.scope(), Scope::Trade);
    }
}
