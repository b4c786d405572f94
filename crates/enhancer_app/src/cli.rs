//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::logging::LogDestination;

/// Enhances a saved HTML page and plays a scripted scenario against it
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "enhancer_app")]
#[command(long_about = None)]
pub struct CliArgs {
    /// Page to enhance
    #[arg(long, value_name = "FILE.html")]
    pub page: PathBuf,

    /// Steps to play after the page is enhanced
    #[arg(long, value_name = "FILE.ron")]
    pub scenario: Option<PathBuf>,

    /// Enhancer and fetch settings
    #[arg(long, value_name = "FILE.ron")]
    pub config: Option<PathBuf>,

    /// Output directory
    #[arg(long = "out", value_name = "DIR", default_value = "output")]
    pub out_dir: PathBuf,

    /// Where log records go
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal, ignore_case = true)]
    pub log: LogDestination,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
