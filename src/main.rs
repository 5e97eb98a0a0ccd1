//! Binary entry point: resolve configuration, start file logging, open the
//! SQLite store, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use log::{error, info};
use person_registry::config::AppConfig;
use person_registry::logging::init_logging;
use person_registry::{open_db, run_app, App};

/// Returning a `Result` bubbles up fatal problems (an unwritable data
/// directory, a database from an incompatible version, a failed write) to the
/// terminal after it has been restored.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let _logger = init_logging(config.log_level, &config.log_dir)
        .context("failed to start logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let mut app = App::new(conn)?;

    let result = run_app(&mut app);
    match &result {
        Ok(()) => info!("event=app_exit module=core status=ok"),
        Err(err) => error!("event=app_exit module=core status=error error={err:#}"),
    }
    result
}
