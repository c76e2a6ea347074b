//! Output formatter for the interactive session
//!
//! Ensures consistent message styling across the session and its commands.

use std::io::Write;

use console::style;

use super::OutputConfig;

/// Formatter for console output
///
/// Status messages go to stdout, errors and warnings to stderr.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && console::colors_enabled()
    }

    /// Check if progress spinners are enabled
    pub fn progress_enabled(&self) -> bool {
        !self.config.no_progress
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.colors_enabled() {
            println!("{} {message}", style("✓").green());
        } else {
            println!("✓ {message}");
        }
    }

    /// Output an error message
    pub fn error(&self, message: &str) {
        if self.colors_enabled() {
            eprintln!("{} {message}", style("✗").red());
        } else {
            eprintln!("✗ {message}");
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.colors_enabled() {
            eprintln!("{} {message}", style("⚠").yellow());
        } else {
            eprintln!("⚠ {message}");
        }
    }

    /// Print a heading line
    pub fn heading(&self, message: &str) {
        if self.colors_enabled() {
            println!("{}", style(message).bold());
        } else {
            println!("{message}");
        }
    }

    /// Print a line of text
    pub fn println(&self, message: &str) {
        println!("{message}");
    }

    /// Print a prompt without a trailing newline
    pub fn prompt(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = write!(stdout, "{message} ").and_then(|()| stdout.flush()) {
            tracing::debug!(error = %e, "failed to write prompt");
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
