//! Console tracing for the bot.
//!
//! Reads `RUST_LOG`; defaults to `info` so every handler decision is visible.
//! Operator prompts are logged under the `operator` target, which makes them
//! easy to tell apart from automated decisions (`RUST_LOG=operator=info`).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
