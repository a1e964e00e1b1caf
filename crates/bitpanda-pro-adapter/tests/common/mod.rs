/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for bitpanda-pro-adapter tests

use bitpanda_pro_adapter::{
    AccountClient, BitpandaClient, ClientConfig, Credentials, Scope,
};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// API key used across tests
pub fn mock_api_key() -> String {
    "test-api-key".to_string()
}

/// Public client pointed at the mock server
pub fn public_client(server: &MockServer) -> BitpandaClient {
    BitpandaClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Account client pointed at the mock server
#[allow(dead_code)]
pub fn account_client(server: &MockServer, scope: Scope) -> AccountClient {
    AccountClient::with_client(public_client(server), Credentials::new(mock_api_key(), scope))
}
