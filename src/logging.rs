//! Tracing subscriber setup

use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns false if a subscriber was
/// already installed, which is fine for tests and embedding hosts.
pub fn init_logging(level: &str) -> bool {
  let filter = env::var("RUST_LOG")
    .map_or_else(|_| EnvFilter::new(level), |directive| EnvFilter::new(&directive))
    .add_directive(
      "sqlx=warn"
        .parse()
        .unwrap_or_else(|_| tracing::Level::WARN.into()),
    );

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(true))
    .try_init()
    .is_ok()
}
