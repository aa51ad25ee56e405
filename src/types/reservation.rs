use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status reported when the reservation response does not carry one.
pub const DEFAULT_RESERVATION_STATUS: &str = "reserved";

/// A held bike. Nothing is tracked locally; cancel it by `ride_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub ride_id: String,
    pub status: String,
    pub station_id: String,
}

/// Kind of bike to hold, sent as `reservation_item_key`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BikeType {
    #[default]
    Ebike,
    Bike,
}
