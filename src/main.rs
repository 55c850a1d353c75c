//! Main entry point for the lnkshare CLI application.

use clap::Parser;
use lnkshare::{app::App, cli::Args, error::Result};
use simplelog::{Config, WriteLogger};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = lnkshare::cli::Config::from_args(args)?;

    let _ = WriteLogger::init(config.log_level, Config::default(), std::io::stderr());

    let app = App::new(config);
    app.run()
}
