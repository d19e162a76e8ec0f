/// File logging via `tracing`.
///
/// The terminal is in raw mode on the alternate screen while the game
/// runs, so events go to the configured log file only. `RUST_LOG`
/// overrides the configured filter.
///
/// ## Levels
///
/// - **INFO**: level load / solved / lost / restart
/// - **DEBUG**: every resolved move with its events, every undo
/// - **TRACE**: chain walks inside the movement engine
/// - **WARN**: skipped level files, config problems

use std::fs::File;
use std::sync::{Arc, OnceLock};

use tracing::warn;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once; only the
/// first call has effect. `Ok(false)` when logging is disabled.
pub fn init(cfg: &LogConfig) -> std::io::Result<bool> {
    let Some(path) = &cfg.file else {
        return Ok(false);
    };
    if INIT.get().is_some() {
        return Ok(true);
    }

    let file = File::create(path)?;
    let (directive, bad_filter) = match default_directive(&cfg.filter) {
        Ok(d) => (d, None),
        Err(e) => (LevelFilter::INFO.into(), Some(e)),
    };

    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(directive)
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
            .try_init();
    });

    if let Some(e) = bad_filter {
        warn!(filter = %cfg.filter, "invalid log filter, using info: {e}");
    }
    Ok(true)
}

fn default_directive(filter: &str) -> Result<Directive, tracing_subscriber::filter::ParseError> {
    filter.trim().parse()
}
