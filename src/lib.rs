//! Async client for the Bay Wheels bike-share private API.
//!
//! Covers the SMS login flow (with the email-verification escalation),
//! token persistence across runs, station inventory, and bike reservations.
//! The upstream API is undocumented; responses are parsed defensively, see
//! [`parse`].
//!
//! # Quick Start
//!
//! ```no_run
//! use bay_wheels::prelude::*;
//!
//! # async fn example() -> bay_wheels::Result<()> {
//! let mut client = BayWheelsClient::new(ClientConfig::from_env())?;
//! client.load_token()?;
//! for station in client.list_stations().await? {
//!     println!("{}: {} e-bikes", station.display_name(), station.ebikes_available);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod parse;
pub mod prelude;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::BayWheelsClient;
pub use config::ClientConfig;
pub use error::{BayWheelsError, ReservationError, Result};
pub use types::{BikeType, Reservation, Station};
