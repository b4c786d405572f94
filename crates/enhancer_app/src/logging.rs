//! Logger setup for the driver binary.
//!
//! File output goes to `./enhancer.log` in the current working directory.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_FILE: &str = "./enhancer.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogDestination {
    File,
    #[default]
    #[value(alias = "term")]
    Terminal,
    Both,
}

/// Installs the global logger. A second call is a no-op.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();
    let terminal = || -> Box<dyn SharedLogger> {
        TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(terminal());
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        match create_file_logger(Path::new(LOG_FILE), level, config.clone()) {
            Some(file_logger) => loggers.push(file_logger),
            // Never run silent: fall back to the terminal.
            None if loggers.is_empty() => loggers.push(terminal()),
            None => {}
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<dyn SharedLogger>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create log file at {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::LogDestination;

    #[test]
    fn destinations_parse_case_insensitively() {
        assert_eq!(LogDestination::from_str("FILE", true), Ok(LogDestination::File));
        assert_eq!(LogDestination::from_str("term", true), Ok(LogDestination::Terminal));
        assert_eq!(LogDestination::from_str("Both", true), Ok(LogDestination::Both));
        assert!(LogDestination::from_str("syslog", true).is_err());
    }
}
