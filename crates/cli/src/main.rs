//! s3cm - interactive S3 bucket session
//!
//! Select or provision a bucket, then manage its objects from a numbered menu.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use s3cm::commands::{self, Cli};

/// Crates whose debug output `--debug` turns on
const DEBUG_DIRECTIVES: &str = "s3cm=debug,s3cm_core=debug,s3cm_s3=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(DEBUG_DIRECTIVES)
    } else {
        EnvFilter::from_default_env()
    };

    // Log to stderr so prompts on stdout stay readable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
