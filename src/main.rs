use anyhow::Context;
use tracing::error;
use tracing_subscriber::EnvFilter;

use b1_suppliers::{acquire_session, fetch_suppliers, Config};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("loading configuration")?;
    let mut session = acquire_session(&config).context("acquiring Service Layer session")?;

    match fetch_suppliers(&session, None) {
        Ok(suppliers) if suppliers.is_empty() => {
            println!("No suppliers found.");
        }
        Ok(suppliers) => {
            println!("{}", serde_json::to_string_pretty(&suppliers)?);
            println!("\nTotal records: {}", suppliers.len());
        }
        Err(e) => {
            // Query failure is not fatal; still log out below.
            error!(error = %e, "could not fetch supplier data");
        }
    }

    session.release();
    Ok(())
}
