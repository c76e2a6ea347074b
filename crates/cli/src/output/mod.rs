//! Output formatting utilities
//!
//! Console output for the interactive session: status messages, prompts,
//! and spinners for storage calls.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::Spinner;

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinners
    pub no_progress: bool,
}

impl OutputConfig {
    /// Merge command-line flags with the `[defaults]` section of the config file
    pub fn from_defaults(defaults: &s3cm_core::Defaults, no_color: bool, no_progress: bool) -> Self {
        match defaults.color.as_str() {
            "always" => console::set_colors_enabled(true),
            "never" => console::set_colors_enabled(false),
            _ => {}
        }

        Self {
            no_color: no_color || defaults.color == "never",
            no_progress: no_progress || !defaults.progress,
        }
    }
}
