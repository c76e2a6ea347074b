//! rm command - Delete an object
//!
//! Prompts for a key, asks for confirmation, and deletes the object.

use std::io::BufRead;

use s3cm_core::BucketHandle;

use super::{confirm, prompt_key};
use crate::exit_code::ExitCode;
use crate::input::Prompter;
use crate::session::SessionContext;

/// Execute the rm command
pub async fn execute<R: BufRead>(
    ctx: &SessionContext<'_>,
    bucket: &BucketHandle,
    input: &mut Prompter<R>,
) -> ExitCode {
    let key = match prompt_key(ctx, input, "Enter the key of the object to delete:") {
        Ok(Some(key)) => key,
        Ok(None) => return ExitCode::Success,
        Err(code) => return code,
    };

    match confirm(ctx, input, &format!("Delete {bucket}/{key}?")) {
        Ok(true) => {}
        Ok(false) => {
            ctx.formatter.println("Nothing deleted.");
            return ExitCode::Success;
        }
        Err(code) => return code,
    }

    match ctx.store.delete_object(bucket.as_str(), &key).await {
        Ok(()) => {
            ctx.formatter.success(&format!("Deleted {bucket}/{key}."));
            ExitCode::Success
        }
        Err(e) if e.is_not_found() => {
            ctx.formatter
                .error(&format!("Object '{key}' not found in {bucket}"));
            ExitCode::NotFound
        }
        Err(e) => {
            ctx.formatter.error(&format!("Failed to delete object: {e}"));
            ExitCode::from(&e)
        }
    }
}
