//! # Logging Setup
//! src/logging.rs
//!
//! Console logging via log4rs with a fixed `timestamp | LEVEL | target |
//! message` layout. The level comes from the configuration surface
//! (`--log-level` / `LOG_LEVEL`).

use std::error::Error;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Initializes the global logger. Unknown level names fall back to `info`.
pub fn init(level: &str) -> Result<(), Box<dyn Error>> {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%dT%H:%M:%S)} | {l} | {t} | {m}{n}",
        )))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;

    log4rs::init_config(config)?;
    Ok(())
}
