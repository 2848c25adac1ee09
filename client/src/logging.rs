//! Logging configuration

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ClientError, ClientResult};

/// Initialize logging with the specified level; `RUST_LOG` takes precedence
pub fn init(level: &str) -> ClientResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init()
        .map_err(|e| ClientError::InvalidConfig(format!("Failed to init logging: {}", e)))
}
