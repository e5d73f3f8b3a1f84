//! Logging initialization for the navigator binary.
//!
//! The terminal belongs to the renderer, so log output only ever goes to the
//! file named in the config.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use navigator_logging::parse_level;
use simplelog::{CombinedLogger, Config, ConfigBuilder, SharedLogger, WriteLogger};

use super::config::LoggingConfig;

/// Installs the global file logger at the configured level.
///
/// A log file that cannot be created is reported on stderr and logging stays
/// disabled; the application still starts.
pub fn initialize(settings: &LoggingConfig) {
    let level = parse_level(&settings.level);
    if level == LevelFilter::Off {
        return;
    }

    let Some(file_logger) = create_file_logger(level, build_config(), &settings.file) else {
        return;
    };
    let loggers: Vec<Box<dyn SharedLogger>> = vec![file_logger];
    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config, path: &Path) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
