//! Menu dispatch
//!
//! Turns a line of menu input into a [`MenuChoice`] and routes it to one of the
//! content commands. Bad input never reaches a command.

use std::fmt;
use std::io::BufRead;

use s3cm_core::BucketHandle;
use thiserror::Error;

use crate::commands::{edit, ls, put, rm};
use crate::exit_code::ExitCode;
use crate::input::Prompter;
use crate::session::SessionContext;

/// An option from the session menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    List,
    Delete,
    Create,
    Edit,
}

/// Menu input that could not be turned into a choice
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Not an integer
    #[error("{0} is invalid. Please enter only the number of the option you want")]
    InputFormat(String),

    /// An integer outside the menu
    #[error("{0} is not a valid option. Please enter one of the numbers given")]
    UnrecognizedChoice(i64),
}

impl MenuChoice {
    /// All choices in menu order
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::Exit,
        MenuChoice::List,
        MenuChoice::Delete,
        MenuChoice::Create,
        MenuChoice::Edit,
    ];

    /// Parse one line of menu input
    pub fn parse(input: &str) -> Result<Self, DispatchError> {
        let trimmed = input.trim();
        let number: i64 = trimmed
            .parse()
            .map_err(|_| DispatchError::InputFormat(trimmed.to_string()))?;
        Self::from_number(number).ok_or(DispatchError::UnrecognizedChoice(number))
    }

    pub const fn from_number(number: i64) -> Option<Self> {
        match number {
            0 => Some(Self::Exit),
            1 => Some(Self::List),
            2 => Some(Self::Delete),
            3 => Some(Self::Create),
            4 => Some(Self::Edit),
            _ => None,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::List => 1,
            Self::Delete => 2,
            Self::Create => 3,
            Self::Edit => 4,
        }
    }

    /// Menu line for this choice
    pub fn describe(self, bucket: &BucketHandle) -> String {
        let text = match self {
            Self::Exit => "Exit the program".to_string(),
            Self::List => format!("List bucket contents - display a list of {bucket}'s contents"),
            Self::Delete => format!("Delete an object in {bucket}"),
            Self::Create => format!("Create a new object in {bucket}"),
            Self::Edit => format!("Edit an object in {bucket}"),
        };
        format!("{} {text}", self.number())
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exit => "exit",
            Self::List => "list",
            Self::Delete => "delete",
            Self::Create => "create",
            Self::Edit => "edit",
        };
        f.write_str(s)
    }
}

/// What the session does after a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again
    Continue,
    /// End the session with this exit code
    Exit(ExitCode),
}

/// Run the command for `choice` against `bucket`
///
/// Command failures are reported by the command itself and the session continues.
/// Only [`MenuChoice::Exit`], or input running out mid-command, ends the session.
pub async fn dispatch<R: BufRead>(
    choice: MenuChoice,
    ctx: &SessionContext<'_>,
    bucket: &BucketHandle,
    input: &mut Prompter<R>,
) -> Flow {
    tracing::debug!(%choice, bucket = %bucket, "dispatching menu choice");

    let code = match choice {
        MenuChoice::Exit => return Flow::Exit(ExitCode::Success),
        MenuChoice::List => ls::execute(ctx, bucket).await,
        MenuChoice::Delete => rm::execute(ctx, bucket, input).await,
        MenuChoice::Create => put::execute(ctx, bucket, input).await,
        MenuChoice::Edit => edit::execute(ctx, bucket, input).await,
    };

    match code {
        ExitCode::Interrupted => Flow::Exit(ExitCode::Interrupted),
        ExitCode::Success => Flow::Continue,
        other => {
            tracing::debug!(%choice, code = other.as_i32(), "command failed");
            Flow::Continue
        }
    }
}
