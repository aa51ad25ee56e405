//! Bay Wheels CLI binary entry point.

use bay_wheels::cli::{AuthCommands, Cli, Commands};
use bay_wheels::{BayWheelsClient, ClientConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(path) = cli.token_path {
        config.token_path = Some(path);
    }

    let mut client = match BayWheelsClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login(args) => {
                bay_wheels::cli::auth::handle_login(&mut client, args.phone, args.force).await
            }
            AuthCommands::Status => bay_wheels::cli::auth::handle_status(&mut client),
            AuthCommands::Logout => bay_wheels::cli::auth::handle_logout(&mut client),
        },
        Commands::Stations(args) => {
            bay_wheels::cli::rides::handle_stations(&mut client, args.limit).await
        }
        Commands::Reserve(args) => {
            bay_wheels::cli::rides::handle_reserve(&mut client, &args.station_id, args.bike_type)
                .await
        }
        Commands::Cancel(args) => {
            bay_wheels::cli::rides::handle_cancel(&mut client, &args.ride_id).await
        }
    };
    client.close();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = bay_wheels::cli::login_hint(e.as_ref()) {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}
