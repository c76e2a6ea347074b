//! Interactive session
//!
//! Asks for a bucket name until one is acquired, then shows the menu and
//! dispatches choices until the operator exits or input runs out.

use std::io::BufRead;

use s3cm_core::{AcquireError, BucketHandle, BucketName, BucketResolver, StorageClient};

use crate::dispatch::{Flow, MenuChoice, dispatch};
use crate::exit_code::ExitCode;
use crate::input::Prompter;
use crate::output::{Formatter, Spinner};

/// Everything a command needs from the session
pub struct SessionContext<'a> {
    pub store: &'a dyn StorageClient,
    pub formatter: Formatter,
}

impl<'a> SessionContext<'a> {
    pub fn new(store: &'a dyn StorageClient, formatter: Formatter) -> Self {
        Self { store, formatter }
    }
}

/// One interactive session against a single bucket
pub struct Session<'a, R> {
    ctx: SessionContext<'a>,
    input: Prompter<R>,
}

impl<'a, R: BufRead> Session<'a, R> {
    pub fn new(ctx: SessionContext<'a>, reader: R) -> Self {
        Self {
            ctx,
            input: Prompter::new(reader),
        }
    }

    /// Run the session to completion and return the process exit code
    pub async fn run(mut self) -> ExitCode {
        let bucket = match self.acquire_bucket().await {
            Ok(bucket) => bucket,
            Err(code) => return code,
        };

        tracing::info!(bucket = %bucket, created = bucket.was_created(), "session bucket acquired");
        let code = self.menu_loop(&bucket).await;
        if code == ExitCode::Success {
            self.ctx
                .formatter
                .println("Thank you for using s3cm. Goodbye.");
        }
        code
    }

    fn read_line(&mut self) -> Result<String, ExitCode> {
        match self.input.read_line() {
            Ok(Some(line)) => Ok(line),
            Ok(None) => {
                tracing::debug!("input ended");
                Err(ExitCode::Interrupted)
            }
            Err(e) => {
                self.ctx
                    .formatter
                    .error(&format!("Failed to read input: {e}"));
                Err(ExitCode::GeneralError)
            }
        }
    }

    async fn acquire_bucket(&mut self) -> Result<BucketHandle, ExitCode> {
        let resolver = BucketResolver::new(self.ctx.store);

        loop {
            self.ctx
                .formatter
                .prompt("Please enter the name of an S3 bucket:");
            let line = self.read_line()?;

            let name = match BucketName::parse(line) {
                Ok(name) => name,
                Err(violation) => {
                    self.ctx.formatter.error(&violation.to_string());
                    continue;
                }
            };

            let spinner = Spinner::start(&self.ctx.formatter, &format!("Checking bucket {name}..."));
            let result = resolver.acquire(name).await;
            spinner.finish();

            match result {
                Ok(bucket) => {
                    if bucket.was_created() {
                        self.ctx
                            .formatter
                            .success(&format!("Bucket '{bucket}' created."));
                    } else {
                        self.ctx
                            .formatter
                            .success(&format!("Using existing bucket '{bucket}'."));
                    }
                    return Ok(bucket);
                }
                Err(e @ AcquireError::OwnershipConflict(_)) => {
                    self.ctx
                        .formatter
                        .error(&format!("{e}. Please choose a different name."));
                }
                Err(e) => {
                    self.ctx
                        .formatter
                        .error(&format!("{e}. Please try again."));
                }
            }
        }
    }

    fn show_menu(&self, bucket: &BucketHandle) {
        let formatter = &self.ctx.formatter;
        formatter.println("");
        formatter.heading(
            "Please select an option below by entering the corresponding number and pressing enter",
        );
        for choice in MenuChoice::ALL {
            formatter.println(&choice.describe(bucket));
        }
    }

    async fn menu_loop(&mut self, bucket: &BucketHandle) -> ExitCode {
        loop {
            self.show_menu(bucket);
            self.ctx.formatter.prompt(">");
            let line = match self.read_line() {
                Ok(line) => line,
                Err(code) => return code,
            };

            let choice = match MenuChoice::parse(&line) {
                Ok(choice) => choice,
                Err(e) => {
                    self.ctx.formatter.error(&e.to_string());
                    continue;
                }
            };

            if let Flow::Exit(code) = dispatch(choice, &self.ctx, bucket, &mut self.input).await {
                return code;
            }
        }
    }
}
