//! Client configuration.
//!
//! # Design
//! Plain data handed to `ApiClient::new`; storing the values is the whole
//! effect. Credentials for the token exchange ride along with the base URL
//! so the client can build the form body without reaching into any global
//! state.

/// Configuration for the invoicing API client.
///
/// `Default` mirrors the sandbox development settings; real deployments
/// construct this explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// OAuth client id sent with every token exchange.
    pub client_id: String,
    /// OAuth client secret sent with every token exchange.
    pub client_secret: String,
    /// Transport-level timeout applied to each request.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandbox.101digital.io".to_string(),
            client_id: "CHANGEME".to_string(),
            client_secret: "CHANGEME".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_sandbox_and_ten_second_timeout() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://sandbox.101digital.io");
        assert_eq!(config.timeout_ms, 10_000);
    }
}
