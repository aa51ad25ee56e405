//! Convenience re-exports for common use.

pub use crate::auth::{AuthError, AuthState, RequiredField, TokenInfo};
pub use crate::client::BayWheelsClient;
pub use crate::config::ClientConfig;
pub use crate::error::{BayWheelsError, ReservationError, Result};
pub use crate::types::{BikeType, Reservation, Station};
