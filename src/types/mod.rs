//! Domain records returned by the client.

pub mod reservation;
pub mod station;

pub use reservation::{BikeType, Reservation, DEFAULT_RESERVATION_STATUS};
pub use station::Station;
