use anyhow::Result;
use clap::Parser;
use hbnb_console::cli::{Args, CLI};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout belongs to the console, logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cli = CLI::new_with_file(args.file.clone(), &args.prompt);
    cli.run()
}
