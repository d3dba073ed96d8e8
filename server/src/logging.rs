use std::{env, str::FromStr};

use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` sets the filter (default
/// `info`); `LOG_FORMAT=json` switches to JSON lines.
pub fn configure_logging() -> Result<(), anyhow::Error> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_str(
            env::var("RUST_LOG").unwrap_or("info".to_string()).as_str(),
        )?)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    let installed = if env::var("LOG_FORMAT").unwrap_or_default() == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = installed {
        warn!("logging was already initialised: {e}");
    }
    Ok(())
}
