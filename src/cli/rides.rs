//! CLI handlers for stations and reservations.

use crate::auth::AuthError;
use crate::client::BayWheelsClient;
use crate::error::BayWheelsError;
use crate::types::BikeType;

/// Handle `bay-wheels stations`: busiest stations first.
pub async fn handle_stations(
    client: &mut BayWheelsClient,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(client)?;
    let mut stations = client.list_stations().await?;
    println!("Found {} stations\n", stations.len());
    stations.sort_by_key(|station| std::cmp::Reverse(station.total_bikes_available()));

    println!("{}", "-".repeat(80));
    println!("{:<50} {:>8} {:>8} {:>8}", "Station", "E-Bikes", "Bikes", "Docks");
    println!("{}", "-".repeat(80));
    for station in stations.iter().take(limit) {
        println!(
            "{:<50} {:>8} {:>8} {:>8}",
            station.display_name(),
            station.ebikes_available,
            station.bikes_available,
            station.docks_available
        );
    }
    Ok(())
}

/// Handle `bay-wheels reserve <station_id>`.
pub async fn handle_reserve(
    client: &mut BayWheelsClient,
    station_id: &str,
    bike_type: BikeType,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(client)?;
    let reservation = client.create_reservation(station_id, bike_type).await?;
    println!(
        "✅ Reserved {bike_type} at {} (ride {}, {})",
        reservation.station_id, reservation.ride_id, reservation.status
    );
    Ok(())
}

/// Handle `bay-wheels cancel <ride_id>`.
pub async fn handle_cancel(
    client: &mut BayWheelsClient,
    ride_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(client)?;
    client.cancel_reservation(ride_id).await?;
    println!("✅ Cancelled ride {ride_id}");
    Ok(())
}

/// Load the saved token unless one was supplied through the environment.
fn require_session(client: &mut BayWheelsClient) -> Result<(), BayWheelsError> {
    if !client.is_authenticated() && client.load_token()?.is_none() {
        return Err(AuthError::NotAuthenticated("use this command").into());
    }
    Ok(())
}
