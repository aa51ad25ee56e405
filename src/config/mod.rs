//! Client configuration (layered: code > env > defaults).

use std::path::PathBuf;
use std::time::Duration;

use bon::Builder;

pub const DEFAULT_BASE_URL: &str = "https://api.lyft.com";
pub const DEFAULT_USER_AGENT: &str = concat!("bay-wheels-rs/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Paths and grant parameters for the SMS login endpoints.
///
/// These belong to the upstream service and change without notice, so they
/// are configuration rather than constants in the auth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub request_code_path: String,
    pub token_path: String,
    pub grant_type: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            request_code_path: "/v1/phoneauth".to_string(),
            token_path: "/oauth2/access_token".to_string(),
            grant_type: "urn:lyft:oauth2:grant_type:phone".to_string(),
            client_id: None,
            client_secret: None,
        }
    }
}

/// Settings for [`crate::client::BayWheelsClient`].
///
/// # Example
/// ```
/// use bay_wheels::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8080")
///     .persist_token(false)
///     .build();
/// assert!(config.token_path.is_none());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_USER_AGENT.to_string())]
    pub user_agent: String,
    #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))]
    pub timeout: Duration,
    #[builder(default)]
    pub auth_endpoints: AuthEndpoints,
    /// Token file location; `None` means the default under the home directory.
    #[builder(into)]
    pub token_path: Option<PathBuf>,
    /// When false no token is read from or written to disk.
    #[builder(default = true)]
    pub persist_token: bool,
    /// Token to start with, skipping the login flow.
    #[builder(into)]
    pub access_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Load from environment variables (and `.env` if present).
    ///
    /// Reads `BAY_WHEELS_BASE_URL`, `BAY_WHEELS_TOKEN_PATH`,
    /// `BAY_WHEELS_ACCESS_TOKEN`, `BAY_WHEELS_CLIENT_ID` and
    /// `BAY_WHEELS_CLIENT_SECRET`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    fn with_env(mut self, source: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| source(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = lookup("BAY_WHEELS_BASE_URL") {
            self.base_url = url;
        }
        if let Some(path) = lookup("BAY_WHEELS_TOKEN_PATH") {
            self.token_path = Some(PathBuf::from(path));
        }
        if let Some(token) = lookup("BAY_WHEELS_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(client_id) = lookup("BAY_WHEELS_CLIENT_ID") {
            self.auth_endpoints.client_id = Some(client_id);
        }
        if let Some(secret) = lookup("BAY_WHEELS_CLIENT_SECRET") {
            self.auth_endpoints.client_secret = Some(secret);
        }
        self
    }
}
