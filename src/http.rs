//! HTTP client construction and status classification.

use reqwest::StatusCode;

use crate::auth::AuthError;
use crate::config::ClientConfig;
use crate::error::{BayWheelsError, Result};

/// Build the connection pool owned by one client instance.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|err| {
            BayWheelsError::Configuration(format!("failed to build HTTP client: {err}"))
        })
}

/// Map a response status to the error callers should see.
///
/// `403` from any endpoint becomes [`AuthError::AccessDenied`] (usually an
/// expired token). Other non-success statuses go through `otherwise`, which
/// picks the endpoint's own error type.
pub fn check_status(
    status: StatusCode,
    otherwise: impl FnOnce(u16) -> BayWheelsError,
) -> Result<()> {
    if status == StatusCode::FORBIDDEN {
        return Err(AuthError::AccessDenied.into());
    }
    if !status.is_success() {
        return Err(otherwise(status.as_u16()));
    }
    Ok(())
}
