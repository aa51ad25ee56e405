//! CLI entry point for the Bay Wheels client.

pub mod auth;
pub mod rides;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::BayWheelsError;
use crate::types::BikeType;

/// Follow-up advice for a failed command, when the fix is to log in again.
pub fn login_hint(err: &(dyn std::error::Error + 'static)) -> Option<&'static str> {
    err.downcast_ref::<BayWheelsError>()
        .and_then(BayWheelsError::as_auth)
        .filter(|auth| auth.needs_login())
        .map(|_| "run `bay-wheels auth login` to sign in again")
}

/// Bay Wheels CLI
#[derive(Parser, Debug)]
#[command(name = "bay-wheels", version, about = "Bay Wheels bike-share CLI")]
pub struct Cli {
    /// Token file (default: ~/.bay_wheels/token.json)
    #[arg(long, global = true)]
    pub token_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication management
    Auth(AuthArgs),
    /// List stations with bikes available
    Stations(StationsArgs),
    /// Reserve a bike at a station
    Reserve(ReserveArgs),
    /// Cancel a reservation
    Cancel(CancelArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands for login, status, and logout.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with an SMS verification code
    Login(LoginArgs),
    /// Show whether a token is saved
    Status,
    /// Delete the saved token
    Logout,
}

/// Arguments for `bay-wheels auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Phone number in E.164 format (prompted when omitted)
    #[arg(long)]
    pub phone: Option<String>,

    /// Discard any saved token and log in again
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `bay-wheels stations`.
#[derive(Parser, Debug)]
pub struct StationsArgs {
    /// Number of stations to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,
}

/// Arguments for `bay-wheels reserve`.
#[derive(Parser, Debug)]
pub struct ReserveArgs {
    /// Station id, as printed by `stations`
    pub station_id: String,

    /// Kind of bike (ebike or bike)
    #[arg(long, default_value = "ebike")]
    pub bike_type: BikeType,
}

/// Arguments for `bay-wheels cancel`.
#[derive(Parser, Debug)]
pub struct CancelArgs {
    /// Ride id returned by `reserve`
    pub ride_id: String,
}
