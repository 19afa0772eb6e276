use tracing::{debug, error, info, info_span, warn};
use tracing_console_handler::init::{init_tracing_with_config, HandlerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // LOG_HANDLER_LEVEL=debug LOG_HANDLER_PREFIX=auth cargo run --example basic
    let config = HandlerConfig::from_env()?;
    init_tracing_with_config(config)?;

    info!("starting service");
    debug!(cache_entries = 128u64, "cache warmed");

    let span = info_span!("login", user_id = 42u64);
    let _enter = span.enter();

    warn!(attempts = 3u64, "password retry limit close");
    error!(reason = "invalid password", "authentication failed");

    Ok(())
}
