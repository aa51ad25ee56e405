use std::sync::{Arc, OnceLock};

use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::store::{FileTokenStore, TokenStore};
use super::token::TokenInfo;
use crate::config::{AuthEndpoints, ClientConfig};

/// Error codes the token endpoint uses to ask for the account email.
///
/// Detection reads only the `error` code and the `challenges` list. A body
/// that asks for the email solely in `error_description` prose is reported
/// as [`AuthError::LoginFailed`].
const EMAIL_CHALLENGE_CODES: &[&str] = &[
    "email_verification_required",
    "identifier_challenge_required",
];

/// Where the manager stands in the phone → code → token flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// An SMS code was sent; the server holds the code itself.
    CodeRequested { phone_number: String },
    /// The last login attempt was rejected until an email is supplied.
    EmailVerificationRequired { phone_number: String },
    Authenticated,
}

/// Drives the SMS login flow and owns the in-memory access token.
///
/// Mutating operations take `&mut self`: a manager must not run `login` or
/// `request_code` from several tasks at once, and the borrow checker enforces
/// that instead of an internal lock.
///
/// # Example
/// ```no_run
/// use bay_wheels::auth::{AuthError, AuthManager};
/// use bay_wheels::config::ClientConfig;
///
/// # async fn example() -> Result<(), AuthError> {
/// let mut auth = AuthManager::new(reqwest::Client::new(), &ClientConfig::default());
/// auth.request_code("+14155551234").await?;
/// let token = match auth.login("+14155551234", "123456", None).await {
///     Err(AuthError::EmailVerificationRequired) => {
///         auth.login("+14155551234", "123456", Some("rider@example.com")).await?
///     }
///     other => other?,
/// };
/// println!("{}", token.access_token());
/// # Ok(())
/// # }
/// ```
pub struct AuthManager {
    http: reqwest::Client,
    base_url: String,
    endpoints: AuthEndpoints,
    user_agent: String,
    store: Option<Arc<dyn TokenStore>>,
    token: Option<TokenInfo>,
    state: AuthState,
}

impl AuthManager {
    /// Build a manager sharing `http` with the owning client.
    ///
    /// The token store comes from the config: the configured path, the default
    /// path, or none at all when persistence is disabled.
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        let store: Option<Arc<dyn TokenStore>> = if config.persist_token {
            let path = config
                .token_path
                .clone()
                .unwrap_or_else(FileTokenStore::default_path);
            Some(Arc::new(FileTokenStore::new(path)))
        } else {
            None
        };
        let mut manager = Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.auth_endpoints.clone(),
            user_agent: config.user_agent.clone(),
            store,
            token: None,
            state: AuthState::Unauthenticated,
        };
        if let Some(value) = config.access_token.as_deref() {
            match TokenInfo::new(value) {
                Ok(token) => manager.set_token(token),
                Err(_) => tracing::warn!("ignoring blank access token from configuration"),
            }
        }
        manager
    }

    /// Replace the token store (or `None` to disable persistence).
    pub fn with_token_store(mut self, store: Option<Arc<dyn TokenStore>>) -> Self {
        self.store = store;
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Current access token; never touches the network or disk.
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(TokenInfo::access_token)
    }

    pub fn token(&self) -> Option<&TokenInfo> {
        self.token.as_ref()
    }

    /// Install a token obtained elsewhere. It is not persisted.
    pub fn set_token(&mut self, token: TokenInfo) {
        self.token = Some(token);
        self.state = AuthState::Authenticated;
    }

    /// Ask the service to text a verification code to `phone_number`.
    pub async fn request_code(&mut self, phone_number: &str) -> Result<(), AuthError> {
        let phone_number = validate_phone_number(phone_number)?;
        let url = self.url(&self.endpoints.request_code_path);
        let resp = self
            .http
            .post(&url)
            .headers(self.common_headers(false))
            .json(&CodeRequest {
                phone_number,
                voice_verification: false,
            })
            .send()
            .await?;
        let status = resp.status();
        tracing::debug!(%url, status = status.as_u16(), "verification code request");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::CodeRequestFailed {
                status: status.as_u16(),
                message: TokenErrorBody::parse(&body).describe(&body),
            });
        }
        self.state = AuthState::CodeRequested {
            phone_number: phone_number.to_string(),
        };
        Ok(())
    }

    /// Exchange an SMS code (and, on the second attempt, an email) for a token.
    ///
    /// When the server wants the account email and `email` is `None`, this
    /// fails with [`AuthError::EmailVerificationRequired`]; call again with
    /// the email set. On success the token is installed, then persisted; a
    /// failed save is logged and does not fail the login.
    pub async fn login(
        &mut self,
        phone_number: &str,
        code: &str,
        email: Option<&str>,
    ) -> Result<TokenInfo, AuthError> {
        let phone_number = validate_phone_number(phone_number)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyVerificationCode);
        }
        let email = email.map(str::trim).filter(|value| !value.is_empty());

        let mut form = vec![
            ("grant_type", self.endpoints.grant_type.as_str()),
            ("phone_number", phone_number),
            ("phone_code", code),
        ];
        if let Some(email) = email {
            form.push(("email", email));
        }

        let url = self.url(&self.endpoints.token_path);
        let mut request = self
            .http
            .post(&url)
            .headers(self.common_headers(false))
            .form(&form);
        if let Some(client_id) = &self.endpoints.client_id {
            request = request.basic_auth(client_id, self.endpoints.client_secret.as_deref());
        }
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(%url, status = status.as_u16(), "token exchange");

        if !status.is_success() {
            let error = TokenErrorBody::parse(&body);
            if error.requires_email() && email.is_none() {
                self.state = AuthState::EmailVerificationRequired {
                    phone_number: phone_number.to_string(),
                };
                return Err(AuthError::EmailVerificationRequired);
            }
            return Err(AuthError::LoginFailed {
                status: status.as_u16(),
                message: error.describe(&body),
            });
        }

        let payload: TokenResponse = serde_json::from_str(&body)?;
        let token = payload
            .access_token
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AuthError::InvalidResponse("token response missing access_token".to_string())
            })
            .and_then(TokenInfo::issued_now)?;

        self.set_token(token.clone());
        tracing::info!("logged in");
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&token) {
                tracing::warn!(error = %err, "token not saved; session lasts until exit");
            }
        }
        Ok(token)
    }

    /// Populate the in-memory token from the store. No network access.
    pub fn load_token(&mut self) -> Result<Option<TokenInfo>, AuthError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let loaded = store.load()?;
        if let Some(token) = &loaded {
            self.set_token(token.clone());
        }
        Ok(loaded)
    }

    /// Forget the in-memory token and delete the saved one, if any.
    pub fn clear_token(&mut self) -> Result<(), AuthError> {
        self.token = None;
        self.state = AuthState::Unauthenticated;
        if let Some(store) = &self.store {
            store.clear()?;
        }
        tracing::info!("cleared token");
        Ok(())
    }

    /// Headers sent with every request; the bearer token is added when
    /// `authenticated` is set and a token is present.
    pub fn common_headers(&self, authenticated: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(val) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, val);
        }
        if authenticated {
            if let Some(token) = self.access_token() {
                if let Ok(val) = HeaderValue::from_str(&format!("Bearer {token}")) {
                    headers.insert(AUTHORIZATION, val);
                }
            }
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Check E.164 shape: `+`, then 2 to 15 digits with a non-zero country code.
pub fn validate_phone_number(phone_number: &str) -> Result<&str, AuthError> {
    static E164: OnceLock<Regex> = OnceLock::new();
    let trimmed = phone_number.trim();
    let pattern = E164.get_or_init(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("valid regex"));
    if pattern.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(AuthError::InvalidPhoneNumber(phone_number.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    phone_number: &'a str,
    voice_verification: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
    error_description: Option<String>,
    #[serde(default)]
    challenges: Vec<Challenge>,
}

#[derive(Debug, Deserialize)]
struct Challenge {
    identifier: Option<String>,
}

impl TokenErrorBody {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn requires_email(&self) -> bool {
        let code_matches = self
            .error
            .as_deref()
            .is_some_and(|code| EMAIL_CHALLENGE_CODES.contains(&code));
        let challenge_matches = self
            .challenges
            .iter()
            .any(|challenge| challenge.identifier.as_deref() == Some("email"));
        code_matches || challenge_matches
    }

    fn describe(&self, raw: &str) -> String {
        match (&self.error, &self.error_description) {
            (Some(code), Some(description)) => format!("{code}: {description}"),
            (Some(code), None) => code.clone(),
            (None, Some(description)) => description.clone(),
            (None, None) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.chars().take(200).collect()
                }
            }
        }
    }
}
