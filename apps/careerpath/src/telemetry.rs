use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Installs structured logging for hosts that do not bring their own subscriber.
/// Errors (rather than panics) if a global subscriber is already set.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("careerpath v{} logging initialised", env!("CARGO_PKG_VERSION"));
    Ok(())
}
