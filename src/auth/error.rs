use strum::{Display, EnumString};
use thiserror::Error;

/// Marker carried in the message of [`AuthError::EmailVerificationRequired`].
///
/// Callers should match the variant (or [`AuthError::required_field`]); the
/// marker exists for logs and for consumers that only see the rendered text.
pub const EMAIL_VERIFICATION_REQUIRED: &str = "Email verification required";

/// Extra login field the server can demand after a first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RequiredField {
    Email,
}

/// Credential-flow errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid phone number {0:?}: expected E.164 format such as +14155551234")]
    InvalidPhoneNumber(String),
    #[error("Verification code must not be empty")]
    EmptyVerificationCode,
    #[error("Failed to request verification code (status {status}): {message}")]
    CodeRequestFailed { status: u16, message: String },
    #[error("Email verification required: call login again with the account email address")]
    EmailVerificationRequired,
    #[error("Login failed (status {status}): {message}")]
    LoginFailed { status: u16, message: String },
    #[error("Must be authenticated to {0}")]
    NotAuthenticated(&'static str),
    #[error("Access denied - token may be expired")]
    AccessDenied,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Field the caller must supply on the next `login` attempt, if any.
    pub fn required_field(&self) -> Option<RequiredField> {
        match self {
            Self::EmailVerificationRequired => Some(RequiredField::Email),
            _ => None,
        }
    }

    /// Whether the error means the stored token is missing or no longer accepted.
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::NotAuthenticated(_) | Self::AccessDenied)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_escalation_carries_marker_and_field() {
        let err = AuthError::EmailVerificationRequired;
        assert!(err.to_string().contains(EMAIL_VERIFICATION_REQUIRED));
        assert_eq!(err.required_field(), Some(RequiredField::Email));
        assert_eq!(RequiredField::Email.to_string(), "email");
    }

    #[test]
    fn other_errors_require_no_extra_field() {
        let err = AuthError::LoginFailed {
            status: 400,
            message: "invalid_grant".to_string(),
        };
        assert_eq!(err.required_field(), None);
        assert!(!err.needs_login());
        assert!(AuthError::AccessDenied.needs_login());
    }
}
