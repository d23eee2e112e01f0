//! fritzdect - log in to a FRITZ!Box and read a DECT sensor.
//!
//! Authenticates via the PBKDF2 challenge-response flow, queries the
//! device list for one product's temperature and humidity, prints the
//! reading, and logs the session out.

use anyhow::Context;
use clap::Parser;
use fritz_auth::{AuthError, Authenticator};
use fritz_homeauto::HomeautoClient;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// FRITZ!Box sensor readout command-line interface.
#[derive(Parser)]
#[command(name = "fritzdect")]
#[command(about = "Read temperature and humidity from a FRITZ!Box DECT device")]
#[command(version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "FRITZ_URL", default_value = "http://fritz.box")]
    url: String,

    /// Gateway username
    #[arg(short, long, env = "FRITZ_USERNAME")]
    username: String,

    /// Gateway password (prompted when not given)
    #[arg(short, long, env = "FRITZ_PASSWORD")]
    password: Option<String>,

    /// Product name of the device to read
    #[arg(long, default_value = "FRITZ!DECT 440")]
    product: String,

    /// Print the reading as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("failed to read password")?,
    };

    let authenticator = Authenticator::new(&cli.url);
    let sid = match authenticator.login(&cli.username, &password).await {
        Ok(sid) => sid,
        Err(AuthError::InvalidCredentials) => {
            anyhow::bail!("wrong username or password");
        }
        Err(e) => Err(e).context("authentication failed")?,
    };

    let homeauto = HomeautoClient::new(&cli.url);
    let result = homeauto.fetch_device_reading(&sid, &cli.product).await;

    // Invalidate the session even when the query failed; the server
    // would time it out eventually, but not promptly.
    if let Err(e) = authenticator.client().logout(&sid).await {
        warn!(error = %e, "logout failed");
    }

    let reading = result.with_context(|| format!("failed to read {:?}", cli.product))?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reading)?);
    } else {
        println!("{}", reading.temperature_celsius);
        println!("{}", reading.humidity_percent);
    }

    Ok(())
}
