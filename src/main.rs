use std::io;

use chrono::Local;
use moon_transit_validator::{AstrotimesRunner, ValidatorConfig, ValidatorError, logging, report};

fn main() {
    let (config, load_error) = match ValidatorConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (ValidatorConfig::default(), Some(e)),
    };

    logging::init(&config.logging);
    if let Some(e) = load_error {
        match e.downcast_ref::<ValidatorError>() {
            Some(err) => tracing::warn!(
                "ignoring configuration, using defaults: {err}. {}",
                err.user_message()
            ),
            None => tracing::warn!("ignoring configuration, using defaults: {e:#}"),
        }
    }

    let runner = AstrotimesRunner::from_config(&config.astrotimes);
    let today = Local::now().date_naive();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = report::print(&mut out, &runner, &config.locations, today) {
        tracing::error!("{} ({e})", e.user_message());
    }
}
