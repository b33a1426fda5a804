use rbl::{LedgerConfig, Result};

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Warn-level logging to stderr unless `RUST_LOG` says otherwise
pub fn configure_app() -> Result<LedgerConfig> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    return Ok(LedgerConfig::default());
}
