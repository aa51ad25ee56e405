//! Turning raw response bodies into domain records.
//!
//! Both parsers are pure: they take the bytes the transport handed back and
//! never touch the network. The inventory endpoint sometimes double-encodes
//! its GeoJSON, and the reservation endpoint may answer in an undocumented
//! binary format, so each parser has a tolerant path next to the strict one.

pub mod reservation;
pub mod stations;

pub use reservation::{extract_ride_id_heuristic, parse_reservation};
pub use stations::{parse_stations, STATION_ITEM_TYPE};
