use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// Access token held by the auth manager and persisted by a token store.
///
/// The access token is never empty: both [`TokenInfo::new`] and
/// deserialization reject an empty value.
///
/// # Example
/// ```
/// use bay_wheels::auth::TokenInfo;
///
/// let token = TokenInfo::new("access")?;
/// assert_eq!(token.access_token(), "access");
/// assert!(token.obtained_at().is_none());
/// # Ok::<(), bay_wheels::auth::AuthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenInfo")]
pub struct TokenInfo {
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    obtained_at: Option<DateTime<Utc>>,
}

impl TokenInfo {
    pub fn new(access_token: impl Into<String>) -> Result<Self, AuthError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(AuthError::InvalidResponse(
                "access token must not be empty".to_string(),
            ));
        }
        Ok(Self {
            access_token,
            obtained_at: None,
        })
    }

    /// Token stamped with the current time.
    pub fn issued_now(access_token: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self::new(access_token)?.with_obtained_at(Utc::now()))
    }

    pub fn with_obtained_at(mut self, obtained_at: DateTime<Utc>) -> Self {
        self.obtained_at = Some(obtained_at);
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn obtained_at(&self) -> Option<DateTime<Utc>> {
        self.obtained_at
    }
}

#[derive(Deserialize)]
struct RawTokenInfo {
    access_token: String,
    #[serde(default)]
    obtained_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawTokenInfo> for TokenInfo {
    type Error = AuthError;

    fn try_from(raw: RawTokenInfo) -> Result<Self, Self::Error> {
        let token = Self::new(raw.access_token)?;
        Ok(match raw.obtained_at {
            Some(at) => token.with_obtained_at(at),
            None => token,
        })
    }
}
