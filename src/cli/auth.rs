//! CLI auth command handlers for login, status, and logout.

use std::io::Write;

use crate::auth::{AuthError, RequiredField};
use crate::client::BayWheelsClient;

/// Handle `bay-wheels auth login`.
///
/// Reuses a saved token unless `force` is set. When the service asks for the
/// account email, prompts for it and retries once.
pub async fn handle_login(
    client: &mut BayWheelsClient,
    phone: Option<String>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if force {
        client.clear_token()?;
    } else if let Some(token) = client.load_token()? {
        println!("✅ Already logged in (token {})", preview(token.access_token()));
        return Ok(());
    }

    let phone = match phone {
        Some(phone) => phone,
        None => prompt("📱 Phone number (E.164, e.g. +14155551234)")?,
    };

    client.request_code(&phone).await?;
    println!("📨 Verification code sent to {phone}");
    let code = prompt("🔢 Verification code")?;

    let token = match client.login(&phone, &code, None).await {
        Ok(token) => token,
        Err(err)
            if err.as_auth().and_then(AuthError::required_field) == Some(RequiredField::Email) =>
        {
            println!("{err}");
            let email = prompt("📧 Email address")?;
            client.login(&phone, &code, Some(&email)).await?
        }
        Err(err) => return Err(err.into()),
    };

    println!("✅ Logged in (token {})", preview(&token));
    Ok(())
}

/// Handle `bay-wheels auth status`.
pub fn handle_status(client: &mut BayWheelsClient) -> Result<(), Box<dyn std::error::Error>> {
    match client.load_token()? {
        Some(token) => {
            let since = token
                .obtained_at()
                .map(|at| format!(" since {}", at.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            println!("✅ Logged in{since} (token {})", preview(token.access_token()));
        }
        None => println!("❌ Not logged in"),
    }
    Ok(())
}

/// Handle `bay-wheels auth logout`.
pub fn handle_logout(client: &mut BayWheelsClient) -> Result<(), Box<dyn std::error::Error>> {
    client.clear_token()?;
    println!("✅ Logged out");
    Ok(())
}

fn prompt(label: &str) -> std::io::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn preview(token: &str) -> String {
    let shown: String = token.chars().take(20).collect();
    format!("{shown}...")
}
