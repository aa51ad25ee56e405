//! High-level client over the station and reservation endpoints.

use std::sync::Arc;

use serde::Serialize;

use crate::auth::{AuthError, AuthManager, AuthState, TokenInfo, TokenStore};
use crate::config::ClientConfig;
use crate::error::{BayWheelsError, ReservationError, Result};
use crate::http::{build_client, check_status};
use crate::parse::{parse_reservation, parse_stations};
use crate::types::{BikeType, Reservation, Station};

pub const INVENTORY_PATH: &str = "/v1/lbsbff/map/inventory";
pub const RESERVE_PATH: &str = "/v1/last-mile/stations/reserve/v2";
pub const CANCEL_PATH: &str = "/v1/last-mile/rides/cancel";

/// Async client for the Bay Wheels bike-share API.
///
/// The HTTP connection pool is created in [`BayWheelsClient::new`] and released
/// when the client is dropped or passed to [`BayWheelsClient::close`]. One
/// client serves one logical flow; operations that change the session take
/// `&mut self`.
///
/// # Example
/// ```no_run
/// use bay_wheels::{BayWheelsClient, BikeType, ClientConfig};
///
/// # async fn example() -> bay_wheels::Result<()> {
/// let mut client = BayWheelsClient::new(ClientConfig::from_env())?;
/// if client.load_token()?.is_none() {
///     client.request_code("+14155551234").await?;
///     client.login("+14155551234", "123456", None).await?;
/// }
/// let stations = client.list_stations().await?;
/// if let Some(station) = stations.iter().find(|s| s.ebikes_available > 0) {
///     let reservation = client.create_reservation(&station.id, BikeType::Ebike).await?;
///     client.cancel_reservation(&reservation.ride_id).await?;
/// }
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct BayWheelsClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthManager,
}

impl BayWheelsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = build_client(&config)?;
        let auth = AuthManager::new(http.clone(), &config);
        tracing::debug!(base_url = %config.base_url, "opened client session");
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Client configured from `BAY_WHEELS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Replace the token store (or `None` to disable persistence).
    pub fn with_token_store(mut self, store: Option<Arc<dyn TokenStore>>) -> Self {
        self.auth = self.auth.with_token_store(store);
        self
    }

    /// Release the HTTP session. Dropping the client has the same effect.
    pub fn close(self) {
        tracing::debug!(base_url = %self.base_url, "closed client session");
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn auth_state(&self) -> &AuthState {
        self.auth.state()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.auth.access_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.access_token().is_some()
    }

    pub fn set_token(&mut self, token: TokenInfo) {
        self.auth.set_token(token);
    }

    /// Load a saved token from disk, if there is one.
    pub fn load_token(&mut self) -> Result<Option<TokenInfo>> {
        Ok(self.auth.load_token()?)
    }

    /// Forget the current token and delete the saved one.
    pub fn clear_token(&mut self) -> Result<()> {
        Ok(self.auth.clear_token()?)
    }

    /// Request an SMS verification code for an E.164 phone number.
    pub async fn request_code(&mut self, phone_number: &str) -> Result<()> {
        Ok(self.auth.request_code(phone_number).await?)
    }

    /// Exchange a verification code for an access token and return it.
    ///
    /// See [`AuthManager::login`] for the email escalation contract.
    pub async fn login(
        &mut self,
        phone_number: &str,
        code: &str,
        email: Option<&str>,
    ) -> Result<String> {
        let token = self.auth.login(phone_number, code, email).await?;
        Ok(token.access_token().to_string())
    }

    /// All stations with current availability.
    pub async fn list_stations(&self) -> Result<Vec<Station>> {
        self.require_token("list stations")?;
        let resp = self.post(INVENTORY_PATH, &serde_json::json!({})).await?;
        check_status(resp.status(), |status| {
            BayWheelsError::api(status, "Failed to get stations")
        })?;
        let body = resp.bytes().await?;
        parse_stations(&body)
    }

    /// One station by id, from a fresh listing.
    pub async fn get_station(&self, station_id: &str) -> Result<Option<Station>> {
        let stations = self.list_stations().await?;
        Ok(stations.into_iter().find(|station| station.id == station_id))
    }

    /// Hold a bike at `station_id`.
    pub async fn create_reservation(
        &self,
        station_id: &str,
        bike_type: BikeType,
    ) -> Result<Reservation> {
        self.require_token("create reservations")?;
        let request = ReserveRequest {
            station_id,
            reservation_item_key: bike_type,
            is_apple_pay_authorization_needed: false,
        };
        let resp = self.post(RESERVE_PATH, &request).await?;
        check_status(resp.status(), |status| {
            ReservationError::CreateFailed { status }.into()
        })?;
        let body = resp.bytes().await?;
        let reservation = parse_reservation(&body, station_id)?;
        tracing::info!(ride_id = %reservation.ride_id, station_id, "reserved bike");
        Ok(reservation)
    }

    /// Cancel an active reservation.
    pub async fn cancel_reservation(&self, ride_id: &str) -> Result<()> {
        self.require_token("cancel reservations")?;
        let resp = self.post(CANCEL_PATH, &CancelRequest { ride_id }).await?;
        check_status(resp.status(), |status| {
            ReservationError::CancelFailed { status }.into()
        })?;
        tracing::info!(ride_id, "cancelled reservation");
        Ok(())
    }

    fn require_token(&self, action: &'static str) -> Result<()> {
        if self.auth.access_token().is_none() {
            return Err(AuthError::NotAuthenticated(action).into());
        }
        Ok(())
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .post(&url)
            .headers(self.auth.common_headers(true))
            .json(body)
            .send()
            .await?;
        tracing::debug!(%url, status = resp.status().as_u16(), "POST");
        Ok(resp)
    }
}

#[derive(Debug, Serialize)]
struct ReserveRequest<'a> {
    station_id: &'a str,
    reservation_item_key: BikeType,
    is_apple_pay_authorization_needed: bool,
}

#[derive(Debug, Serialize)]
struct CancelRequest<'a> {
    ride_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> BayWheelsClient {
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9/")
            .persist_token(false)
            .build();
        BayWheelsClient::new(config).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(offline_client().base_url, "http://127.0.0.1:9");
    }

    #[test]
    fn reserve_request_wire_shape() {
        let body = serde_json::to_value(ReserveRequest {
            station_id: "st-1",
            reservation_item_key: BikeType::Bike,
            is_apple_pay_authorization_needed: false,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "station_id": "st-1",
                "reservation_item_key": "bike",
                "is_apple_pay_authorization_needed": false
            })
        );
    }

    #[test]
    fn initial_token_from_config_authenticates() {
        let config = ClientConfig::builder()
            .persist_token(false)
            .access_token("tok")
            .build();
        let client = BayWheelsClient::new(config).unwrap();
        assert!(client.is_authenticated());
        assert_eq!(client.access_token(), Some("tok"));
        client.close();
    }
}
