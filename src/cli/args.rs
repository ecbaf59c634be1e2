use clap::Parser;
use std::path::PathBuf;
use crate::storage::DEFAULT_FILE_PATH;

/// Interactive console for records kept in a JSON file.
#[derive(Debug, Parser)]
#[command(name = "hbnb", version, about)]
pub struct Args {
    /// JSON document holding the records
    #[arg(short, long, default_value = DEFAULT_FILE_PATH)]
    pub file: PathBuf,

    /// Log filter used when RUST_LOG is not set (logs go to stderr)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Prompt printed before each command
    #[arg(long, default_value = "(hbnb) ")]
    pub prompt: String,
}
