//! CLI entry point and content commands
//!
//! `Cli` holds the process flags and `execute` runs startup: configuration,
//! credential check, then the interactive session. The submodules are the content
//! commands reachable from the session menu.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use s3cm_core::{ConfigManager, Error, StorageClient as _};
use s3cm_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::input::{END_OF_CONTENT, Prompter};
use crate::output::{Formatter, OutputConfig, Spinner};
use crate::session::{Session, SessionContext};

pub mod edit;
pub mod ls;
pub mod put;
pub mod rm;

const LINE_SEPARATOR: &str = "------------------";

/// s3cm - interactive S3 bucket session
///
/// Pick an existing bucket or provision a new one, then list, create, edit,
/// and delete its objects.
#[derive(Parser, Debug)]
#[command(name = "s3cm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, or a legacy AwsCredentials.properties file)
    #[arg(long, env = "S3CM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress spinners
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Run startup and the interactive session, returning the exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let startup = Formatter::new(OutputConfig {
        no_color: cli.no_color,
        no_progress: cli.no_progress,
    });

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => match ConfigManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                startup.error(&e.to_string());
                return ExitCode::from(&e);
            }
        },
    };

    startup.heading("Welcome to s3cm");
    startup.println(LINE_SEPARATOR);
    startup.println(&format!(
        "Credentials are read from {}",
        config_manager.config_path().display()
    ));

    let config = match config_manager.load() {
        Ok(config) => config,
        Err(e) => {
            startup.error(&format!("There was a problem reading your credentials: {e}"));
            if matches!(e, Error::Credentials(_)) {
                match config_manager.write_template() {
                    Ok(true) => startup.println(&format!(
                        "A configuration template was written to {}. Add your access keys and run s3cm again.",
                        config_manager.config_path().display()
                    )),
                    Ok(false) => {}
                    Err(write_err) => {
                        tracing::warn!(error = %write_err, "could not write configuration template")
                    }
                }
            }
            return ExitCode::from(&e);
        }
    };

    let formatter = Formatter::new(OutputConfig::from_defaults(
        &config.defaults,
        cli.no_color,
        cli.no_progress,
    ));

    let client = match S3Client::new(&config.credentials).await {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::NetworkError;
        }
    };

    let spinner = Spinner::start(&formatter, "Verifying credentials...");
    let owner = client.account_owner().await;
    spinner.finish();

    match owner {
        Ok(Some(name)) => formatter.println(&format!("Signed in as {name}")),
        Ok(None) => formatter.println("Signed in"),
        Err(e) => {
            formatter.error(&format!(
                "There was a problem verifying your credentials: {e}"
            ));
            return ExitCode::from(&e);
        }
    }

    let ctx = SessionContext::new(&client, formatter);
    let stdin = std::io::stdin();
    Session::new(ctx, stdin.lock()).run().await
}

/// Prompt for an object key
///
/// `Ok(None)` means the operator entered nothing and the command is cancelled.
pub(crate) fn prompt_key<R: BufRead>(
    ctx: &SessionContext<'_>,
    input: &mut Prompter<R>,
    message: &str,
) -> Result<Option<String>, ExitCode> {
    ctx.formatter.prompt(message);
    let key = read(ctx, input.read_line())?;
    let key = key.trim();
    if key.is_empty() {
        ctx.formatter.println("Cancelled.");
        return Ok(None);
    }
    Ok(Some(key.to_string()))
}

/// Prompt for multi-line object content
pub(crate) fn prompt_content<R: BufRead>(
    ctx: &SessionContext<'_>,
    input: &mut Prompter<R>,
) -> Result<String, ExitCode> {
    ctx.formatter.println(&format!(
        "Enter the content, ending with a line containing only '{END_OF_CONTENT}':"
    ));
    read(ctx, input.read_block())
}

/// Ask a yes/no question; anything but `y` or `yes` is no
pub(crate) fn confirm<R: BufRead>(
    ctx: &SessionContext<'_>,
    input: &mut Prompter<R>,
    message: &str,
) -> Result<bool, ExitCode> {
    ctx.formatter.prompt(&format!("{message} [y/N]"));
    let answer = read(ctx, input.read_line())?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn read(
    ctx: &SessionContext<'_>,
    result: std::io::Result<Option<String>>,
) -> Result<String, ExitCode> {
    match result {
        Ok(Some(text)) => Ok(text),
        Ok(None) => Err(ExitCode::Interrupted),
        Err(e) => {
            ctx.formatter.error(&format!("Failed to read input: {e}"));
            Err(ExitCode::GeneralError)
        }
    }
}

/// Content type for an object key, falling back to plain text
pub(crate) fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or("text/plain")
        .to_string()
}
